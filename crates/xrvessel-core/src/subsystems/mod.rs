//! Subsystems - per-door behaviour behind the shared door state machine
//!
//! Every fitted door gets one [`Subsystem`] in the vessel's
//! [`SubsystemTable`]. The table owns the activation path (failure check,
//! interlocks, hydraulics, cascades); subsystems only say what is special
//! about their door.

mod airlock;
mod apu;
mod engine_doors;
mod gear;
mod hatch;

pub use airlock::*;
pub use engine_doors::*;
pub use gear::*;
pub use hatch::*;

use std::any::Any;

use xrvessel_logic::config::VesselConfig;
use xrvessel_logic::door::{toggle_direction, Direction, DoorId, DoorStatus};

use crate::sound::SoundType;
use crate::vessel::{VesselError, VesselState};

/// An interlock refusing an activation.
#[derive(Debug, Clone, PartialEq)]
pub struct Interlock {
    pub sound_file: Option<&'static str>,
    pub message: String,
    /// Play the error beep along with the warning.
    pub beep: bool,
}

impl Interlock {
    pub fn new(sound_file: &'static str, message: impl Into<String>) -> Self {
        Self {
            sound_file: Some(sound_file),
            message: message.into(),
            beep: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.beep = false;
        self
    }
}

/// A follow-up activation triggered by an accepted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub door: DoorId,
    pub target: DoorStatus,
    /// Bypass interlocks and hydraulics.
    pub forced: bool,
}

impl Cascade {
    pub fn request(door: DoorId, target: DoorStatus) -> Self {
        Self {
            door,
            target,
            forced: false,
        }
    }

    pub fn force(door: DoorId, target: DoorStatus) -> Self {
        Self {
            door,
            target,
            forced: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The door has failed; only a repair brings it back.
    Failed,
    Interlock,
    NoHydraulics,
    /// Crew cannot operate the control, or the request made no sense.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Started,
    /// Already there or already on its way.
    Unchanged,
    Rejected(Rejection),
}

/// Door-specific behaviour.
pub trait Subsystem: Send {
    fn door(&self) -> DoorId;

    /// Interlock check for a requested direction. On success returns the
    /// activations that must follow this one.
    fn on_activate(&self, _state: &VesselState, _direction: Direction) -> Result<Vec<Cascade>, Interlock> {
        Ok(Vec::new())
    }

    /// Runs every tick after the door has moved.
    fn on_tick(&self, _state: &mut VesselState) {}

    /// Stress check. Returns true on a new failure.
    fn on_failure_check(&self, state: &mut VesselState) -> bool {
        state.check_door_failure(self.door())
    }

    fn as_any(&self) -> &dyn Any;
}

/// A door with nothing special about it: hydraulics only.
pub struct PlainDoor {
    pub door: DoorId,
}

impl Subsystem for PlainDoor {
    fn door(&self) -> DoorId {
        self.door
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Subsystems of one vessel, in configuration order.
pub struct SubsystemTable {
    subsystems: Vec<Box<dyn Subsystem>>,
}

impl SubsystemTable {
    pub fn for_config(config: &VesselConfig) -> Self {
        let subsystems = config
            .doors
            .iter()
            .map(|spec| -> Box<dyn Subsystem> {
                match spec.id {
                    DoorId::LandingGear => Box::new(LandingGear),
                    DoorId::Nosecone => Box::new(Nosecone),
                    DoorId::OuterAirlock => Box::new(OuterAirlock),
                    DoorId::InnerAirlock => Box::new(InnerAirlock),
                    DoorId::AirlockChamber => Box::new(AirlockChamber),
                    DoorId::Hatch => Box::new(CrewHatch),
                    DoorId::Ladder => Box::new(Ladder),
                    DoorId::RetroDoors => Box::new(EngineDoors::new(DoorId::RetroDoors, EngineGroup::Retro)),
                    DoorId::HoverDoors => Box::new(EngineDoors::new(DoorId::HoverDoors, EngineGroup::Hover)),
                    DoorId::ScramDoors => Box::new(EngineDoors::new(DoorId::ScramDoors, EngineGroup::Scram)),
                    id => Box::new(PlainDoor { door: id }),
                }
            })
            .collect();
        Self { subsystems }
    }

    pub fn get(&self, id: DoorId) -> Option<&dyn Subsystem> {
        self.subsystems
            .iter()
            .find(|s| s.door() == id)
            .map(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Subsystem> {
        self.subsystems.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.subsystems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsystems.is_empty()
    }

    /// Request a door to move toward `target`.
    pub fn activate(&self, state: &mut VesselState, id: DoorId, target: DoorStatus) -> Result<ActivationOutcome, VesselError> {
        let subsystem = self.get(id).ok_or(VesselError::DoorNotFitted(id))?;
        let spec = state.door_spec(id).cloned().ok_or(VesselError::DoorNotFitted(id))?;
        let door = state.door(id).ok_or(VesselError::DoorNotFitted(id))?;
        let Some(direction) = target.direction() else {
            return Ok(ActivationOutcome::Rejected(Rejection::Ignored));
        };

        if door.status == direction.terminal_status()
            || (door.status == direction.moving_status() && !door.arrested)
        {
            return Ok(ActivationOutcome::Unchanged);
        }

        if door.is_failed() {
            state.play_error_beep();
            state.show_warning(None, SoundType::None, &spec.inoperative_message(), false);
            return Ok(ActivationOutcome::Rejected(Rejection::Failed));
        }

        let cascades = match subsystem.on_activate(state, direction) {
            Ok(cascades) => cascades,
            Err(interlock) => {
                log::debug!("{} refused: {}", spec.label, interlock.message.replace('&', " "));
                if interlock.beep {
                    state.play_error_beep();
                }
                state.show_warning(interlock.sound_file, SoundType::WarningCallout, &interlock.message, false);
                return Ok(ActivationOutcome::Rejected(Rejection::Interlock));
            }
        };

        if spec.requires_hydraulics && !state.check_hydraulic_pressure(true, true) {
            return Ok(ActivationOutcome::Rejected(Rejection::NoHydraulics));
        }

        state.with_door(id, |d| d.start(direction));
        log::debug!("{} {}", spec.label, direction.moving_status().token());
        self.apply_cascades(state, &cascades);
        Ok(ActivationOutcome::Started)
    }

    /// `Closed`/`Closing` doors open, anything else closes.
    pub fn toggle(&self, state: &mut VesselState, id: DoorId) -> Result<ActivationOutcome, VesselError> {
        let status = state.door(id).ok_or(VesselError::DoorNotFitted(id))?.status;
        self.activate(state, id, toggle_direction(status).moving_status())
    }

    /// Set a door's status past interlocks and hydraulics. Terminal targets
    /// jump proc to the matching extreme; moving targets start travel from
    /// where the door is. A `Failed` door stays failed until repaired.
    pub fn force_activate(&self, state: &mut VesselState, id: DoorId, target: DoorStatus) -> Result<(), VesselError> {
        if !state.has_door(id) {
            return Err(VesselError::DoorNotFitted(id));
        }
        if target != DoorStatus::Failed && state.door_status(id) == DoorStatus::Failed {
            return Err(VesselError::DoorFailed(id));
        }
        state.with_door(id, |door| match target {
            DoorStatus::Open | DoorStatus::Closed => door.jump(target),
            DoorStatus::Opening => door.start(Direction::Opening),
            DoorStatus::Closing => door.start(Direction::Closing),
            DoorStatus::Failed => door.fail(),
            DoorStatus::NotSet => {}
        });
        Ok(())
    }

    fn apply_cascades(&self, state: &mut VesselState, cascades: &[Cascade]) {
        for cascade in cascades {
            if !state.has_door(cascade.door) {
                continue;
            }
            let result = if cascade.forced {
                self.force_activate(state, cascade.door, cascade.target)
                    .map(|_| ActivationOutcome::Started)
            } else {
                self.activate(state, cascade.door, cascade.target)
            };
            if let Ok(ActivationOutcome::Rejected(reason)) = result {
                log::debug!("cascade to {:?} rejected: {:?}", cascade.door, reason);
            }
        }
    }

    /// Stress-check every door. Returns true on any new failure.
    pub fn check_all_door_damage(&self, state: &mut VesselState) -> bool {
        let mut new_damage = false;
        for subsystem in self.iter() {
            new_damage |= subsystem.on_failure_check(state);
        }
        new_damage
    }

    pub fn tick(&self, state: &mut VesselState) {
        for subsystem in self.iter() {
            subsystem.on_tick(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FlightState;
    use crate::sound::SilentSound;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xrvessel_logic::config::VesselType;

    fn setup() -> (VesselState, SubsystemTable) {
        let config = crate::config::builtin_config(VesselType::Xr1).expect("builtin config");
        let table = SubsystemTable::for_config(&config);
        let mut s = VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(11));
        for id in s.fitted_doors() {
            s.with_door(id, |d| d.jump(DoorStatus::Closed));
        }
        s.apu.status = DoorStatus::Open;
        s.flight = FlightState::in_orbit(200e3);
        (s, table)
    }

    #[test]
    fn test_table_matches_config() {
        let (s, table) = setup();
        assert_eq!(table.len(), s.config.doors.len());
        assert!(table.get(DoorId::LandingGear).is_some());
        assert!(table.get(DoorId::BayDoors).is_none());
        assert!(table
            .get(DoorId::Radiator)
            .and_then(|s| s.as_any().downcast_ref::<PlainDoor>())
            .is_some());
    }

    #[test]
    fn test_activate_starts_motion() {
        let (mut s, table) = setup();
        let outcome = table.activate(&mut s, DoorId::Radiator, DoorStatus::Open).unwrap();
        assert_eq!(outcome, ActivationOutcome::Started);
        assert_eq!(s.door_status(DoorId::Radiator), DoorStatus::Opening);
        assert_eq!(s.door_proc(DoorId::Radiator), 0.0);
    }

    #[test]
    fn test_activate_closed_while_closed_is_noop() {
        let (mut s, table) = setup();
        let outcome = table.activate(&mut s, DoorId::Radiator, DoorStatus::Closed).unwrap();
        assert_eq!(outcome, ActivationOutcome::Unchanged);
        assert!(s.notifier.text.is_empty());
    }

    #[test]
    fn test_no_hydraulics_rejects() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Closed;
        let outcome = table.activate(&mut s, DoorId::Radiator, DoorStatus::Opening).unwrap();
        assert_eq!(outcome, ActivationOutcome::Rejected(Rejection::NoHydraulics));
        assert_eq!(s.door_status(DoorId::Radiator), DoorStatus::Closed);
    }

    #[test]
    fn test_failed_door_stays_failed() {
        let (mut s, table) = setup();
        s.with_door(DoorId::Radiator, |d| d.fail());
        let outcome = table.activate(&mut s, DoorId::Radiator, DoorStatus::Opening).unwrap();
        assert_eq!(outcome, ActivationOutcome::Rejected(Rejection::Failed));
        assert!(s
            .notifier
            .text
            .contains("Radiator inoperative due to excessive heat and/or dynamic pressure."));
    }

    #[test]
    fn test_unfitted_door_is_an_error() {
        let (mut s, table) = setup();
        assert_eq!(
            table.activate(&mut s, DoorId::BayDoors, DoorStatus::Opening),
            Err(VesselError::DoorNotFitted(DoorId::BayDoors))
        );
    }

    #[test]
    fn test_toggle_reverses_moving_door() {
        let (mut s, table) = setup();
        table.activate(&mut s, DoorId::Radiator, DoorStatus::Opening).unwrap();
        s.with_door(DoorId::Radiator, |d| d.proc = 0.4);
        table.toggle(&mut s, DoorId::Radiator).unwrap();
        assert_eq!(s.door_status(DoorId::Radiator), DoorStatus::Closing);
        assert_eq!(s.door_proc(DoorId::Radiator), 0.4);
    }

    #[test]
    fn test_force_activate_jumps() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Closed;
        table.force_activate(&mut s, DoorId::Hatch, DoorStatus::Open).unwrap();
        assert_eq!(s.door_status(DoorId::Hatch), DoorStatus::Open);
        assert_eq!(s.door_proc(DoorId::Hatch), 1.0);
    }

    #[test]
    fn test_force_activate_leaves_failed_doors_alone() {
        let (mut s, table) = setup();
        s.with_door(DoorId::Radiator, |d| {
            d.proc = 0.3;
            d.fail();
        });
        for target in [DoorStatus::Open, DoorStatus::Closed, DoorStatus::Opening] {
            assert_eq!(
                table.force_activate(&mut s, DoorId::Radiator, target),
                Err(VesselError::DoorFailed(DoorId::Radiator))
            );
        }
        assert_eq!(s.door_status(DoorId::Radiator), DoorStatus::Failed);
        assert_eq!(s.door_proc(DoorId::Radiator), 0.3);
        assert!(table.force_activate(&mut s, DoorId::Radiator, DoorStatus::Failed).is_ok());
    }

    #[test]
    fn test_arrested_door_needs_reactivation() {
        let (mut s, table) = setup();
        s.with_door(DoorId::Radiator, |d| {
            d.start(Direction::Opening);
            d.proc = 0.5;
            d.arrested = true;
        });
        s.apu.status = DoorStatus::Closed;
        let outcome = table.activate(&mut s, DoorId::Radiator, DoorStatus::Opening).unwrap();
        assert_eq!(outcome, ActivationOutcome::Rejected(Rejection::NoHydraulics));
        assert!(s.door(DoorId::Radiator).map_or(false, |d| d.arrested));

        s.apu.status = DoorStatus::Open;
        let outcome = table.activate(&mut s, DoorId::Radiator, DoorStatus::Opening).unwrap();
        assert_eq!(outcome, ActivationOutcome::Started);
        assert!(!s.door(DoorId::Radiator).map_or(true, |d| d.arrested));
    }
}
