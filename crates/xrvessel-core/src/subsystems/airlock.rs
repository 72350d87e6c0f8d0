//! Nosecone, airlock doors, airlock chamber and ladder.
//!
//! The outer door sits behind the nosecone (the XR5 docking port); the
//! chamber between the two airlock doors is either pressurized (`Closed`)
//! or in vacuum (`Open`). Opening either door sets the chamber to match the
//! side it opens onto.

use std::any::Any;

use xrvessel_logic::door::{Direction, DoorId, DoorStatus};

use super::{Cascade, Interlock, Subsystem};
use crate::sound::files;
use crate::vessel::VesselState;

fn nosecone_label(state: &VesselState) -> String {
    state
        .door_spec(DoorId::Nosecone)
        .map_or_else(|| "Nosecone".to_string(), |s| s.label.clone())
}

/// Outside air is breathable pressure: in atmosphere or docked.
fn pressurized_outside(state: &VesselState) -> bool {
    state.flight.in_atmosphere() || state.flight.docked
}

// ============================================================================
// NOSECONE
// ============================================================================

pub struct Nosecone;

impl Subsystem for Nosecone {
    fn door(&self) -> DoorId {
        DoorId::Nosecone
    }

    fn on_activate(&self, state: &VesselState, direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        if direction == Direction::Opening {
            return Ok(Vec::new());
        }
        if state.flight.docked {
            return Err(Interlock::new(
                files::SHIP_DOCKED,
                format!("Cannot close {} while&ship is docked!", nosecone_label(state)),
            ));
        }
        let mut cascades = Vec::new();
        if matches!(state.door_status(DoorId::OuterAirlock), DoorStatus::Open | DoorStatus::Opening) {
            cascades.push(Cascade::request(DoorId::OuterAirlock, DoorStatus::Closing));
        }
        if state.has_door(DoorId::Ladder) && state.door_status(DoorId::Ladder) != DoorStatus::Closed {
            cascades.push(Cascade::request(DoorId::Ladder, DoorStatus::Closing));
        }
        Ok(cascades)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// AIRLOCK DOORS
// ============================================================================

pub struct OuterAirlock;

impl Subsystem for OuterAirlock {
    fn door(&self) -> DoorId {
        DoorId::OuterAirlock
    }

    fn on_activate(&self, state: &VesselState, direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        let opening = direction == Direction::Opening;
        if opening && state.has_door(DoorId::Nosecone) && state.door_status(DoorId::Nosecone) != DoorStatus::Open {
            return Err(Interlock::new(
                files::OUTER_DOOR_LOCKED,
                format!("WARNING: {} is closed;&cannot open outer door", nosecone_label(state)),
            ));
        }

        let chamber = state.door_status(DoorId::AirlockChamber);
        if !matches!(chamber, DoorStatus::Closed | DoorStatus::Open) {
            return Err(Interlock::new(
                files::CHAMBER_IN_FLUX,
                "WARNING: Airlock chamber pressure is&in flux; outer door is LOCKED.",
            ));
        }
        if !opening {
            return Ok(Vec::new());
        }

        let outside = pressurized_outside(state);
        if !state.interlocks.airlock {
            if chamber == DoorStatus::Open && outside {
                return Err(Interlock::new(
                    files::EXTERNAL_PRESSURE_HIGHER,
                    "WARNING: External pressure is higher&than chamber pressure;&outer door is LOCKED.",
                ));
            }
            if chamber == DoorStatus::Closed && !outside {
                return Err(Interlock::new(
                    files::OUTER_DOOR_LOCKED,
                    "WARNING: Chamber pressure exceeds&external pressure;&outer door is LOCKED.",
                ));
            }
        }

        let chamber_target = if outside {
            DoorStatus::Closed
        } else {
            DoorStatus::Open
        };
        Ok(vec![Cascade::force(DoorId::AirlockChamber, chamber_target)])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct InnerAirlock;

impl Subsystem for InnerAirlock {
    fn door(&self) -> DoorId {
        DoorId::InnerAirlock
    }

    fn on_activate(&self, state: &VesselState, direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        if direction == Direction::Closing {
            return Ok(Vec::new());
        }
        if state.door_status(DoorId::AirlockChamber) != DoorStatus::Closed && !state.interlocks.airlock {
            return Err(Interlock::new(
                files::INNER_DOOR_LOCKED,
                "WARNING: Airlock chamber is&unpressurized; inner door is LOCKED.",
            ));
        }
        Ok(vec![Cascade::force(DoorId::AirlockChamber, DoorStatus::Closed)])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// CHAMBER
// ============================================================================

/// Chamber pressure: `Open` is vacuum, `Closed` is pressurized.
pub struct AirlockChamber;

impl Subsystem for AirlockChamber {
    fn door(&self) -> DoorId {
        DoorId::AirlockChamber
    }

    fn on_activate(&self, state: &VesselState, _direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        if state.door_status(DoorId::InnerAirlock) != DoorStatus::Closed {
            return Err(Interlock::new(files::INNER_DOOR_OPEN, "Inner airlock door is open.").quiet());
        }
        if state.door_status(DoorId::OuterAirlock) != DoorStatus::Closed {
            return Err(Interlock::new(files::OUTER_DOOR_OPEN, "Outer airlock door is open.").quiet());
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// LADDER
// ============================================================================

pub struct Ladder;

impl Subsystem for Ladder {
    fn door(&self) -> DoorId {
        DoorId::Ladder
    }

    fn on_activate(&self, state: &VesselState, direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        if direction == Direction::Closing {
            return Ok(Vec::new());
        }
        if state.door_status(DoorId::Nosecone) != DoorStatus::Open {
            return Err(Interlock::new(
                files::NOSECONE_CLOSED,
                "Cannot deploy ladder while&nosecone is closed!",
            ));
        }
        if state.flight.docked {
            return Err(Interlock::new(files::SHIP_DOCKED, "Cannot deploy ladder while&ship is docked!"));
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
