//! Landing gear interlocks.

use std::any::Any;

use xrvessel_logic::door::{Direction, DoorId};

use super::{Cascade, Interlock, Subsystem};
use crate::sound::files;
use crate::vessel::VesselState;

pub struct LandingGear;

impl Subsystem for LandingGear {
    fn door(&self) -> DoorId {
        DoorId::LandingGear
    }

    fn on_activate(&self, state: &VesselState, direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        if state.flight.ground_contact {
            return Err(Interlock::new(
                files::GEAR_LOCKED,
                "Ship is landed: cannot raise landing gear.",
            ));
        }
        if state.flight.altitude <= state.config.gear_uncompressed_distance {
            let message = match direction {
                Direction::Closing => "Gear in contact with ground:&cannot raise landing gear.",
                Direction::Opening => "Insufficient altitude to lower&the landing gear.",
            };
            return Err(Interlock::new(files::GEAR_LOCKED, message));
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
