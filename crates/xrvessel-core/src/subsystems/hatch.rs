//! Crew hatch interlock.

use std::any::Any;

use xrvessel_logic::door::{Direction, DoorId};

use super::{Cascade, Interlock, Subsystem};
use crate::sound::files;
use crate::vessel::VesselState;

/// Top hatch; stays locked in vacuum unless the pilot overrides it.
pub struct CrewHatch;

impl Subsystem for CrewHatch {
    fn door(&self) -> DoorId {
        DoorId::Hatch
    }

    fn on_activate(&self, state: &VesselState, direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        if direction == Direction::Opening && !state.flight.in_atmosphere() && !state.interlocks.crew_hatch {
            return Err(Interlock::new(files::HATCH_LOCKED, "WARNING: Crew Hatch LOCKED"));
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
