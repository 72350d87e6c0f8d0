//! Engine doors gate their engine group: thrust is only allowed while the
//! doors are fully open.

use std::any::Any;

use xrvessel_logic::door::{DoorId, DoorStatus};

use super::Subsystem;
use crate::vessel::VesselState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineGroup {
    Retro,
    Hover,
    Scram,
}

pub struct EngineDoors {
    door: DoorId,
    group: EngineGroup,
}

impl EngineDoors {
    pub fn new(door: DoorId, group: EngineGroup) -> Self {
        Self { door, group }
    }

    pub fn group(&self) -> EngineGroup {
        self.group
    }
}

impl Subsystem for EngineDoors {
    fn door(&self) -> DoorId {
        self.door
    }

    fn on_tick(&self, state: &mut VesselState) {
        let open = state.door_status(self.door) == DoorStatus::Open;
        match self.group {
            EngineGroup::Retro => state.engines.retro = open,
            EngineGroup::Hover => state.engines.hover = open,
            EngineGroup::Scram => state.engines.scram = open,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
