//! Door motion, door sound cues and airlock decompression.

use std::collections::{HashMap, HashSet};

use xrvessel_logic::constants::airlock::DECOMPRESSION_PROC;
use xrvessel_logic::constants::EARTH_ATM_PRESSURE_THRESHOLD;
use xrvessel_logic::door::{DoorId, DoorStatus};

use super::{PrePostStep, StepContext};
use crate::sound::{files, Playback, SoundSlot, SoundType};
use crate::vessel::VesselState;

// ============================================================================
// DRIVER
// ============================================================================

/// Integrates every moving door, then runs the subsystems' tick hooks.
///
/// A hydraulic door that loses pressure mid-travel is arrested: it keeps
/// its moving status but stays put until it is activated again.
pub struct DoorDriverPostStep;

impl PrePostStep for DoorDriverPostStep {
    fn name(&self) -> &'static str {
        "DoorDriver"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        let hydraulics = state.hydraulics_online();
        for id in state.fitted_doors() {
            let Some((speed, needs_hydraulics)) = state
                .door_spec(id)
                .map(|spec| (spec.operating_speed, spec.requires_hydraulics))
            else {
                continue;
            };
            let Some(door) = state.door(id) else {
                continue;
            };

            match door.status {
                DoorStatus::NotSet => {
                    state.with_door(id, |d| d.reconcile());
                }
                DoorStatus::Opening | DoorStatus::Closing => {
                    if door.arrested {
                        continue;
                    }
                    if needs_hydraulics && !hydraulics {
                        log::debug!("{:?} arrested at {:.3}: no hydraulic pressure", id, door.proc);
                        state.with_door(id, |d| d.arrested = true);
                        continue;
                    }
                    state.with_door(id, |d| d.advance(ctx.simdt, speed));
                    if needs_hydraulics {
                        state.mark_apu_active();
                    }
                }
                _ => {}
            }
        }
        ctx.subsystems.tick(state);
    }
}

// ============================================================================
// SOUNDS
// ============================================================================

/// Hydraulic loop while a door moves, a thump when it stops, and the
/// departure/arrival info messages. Nothing plays for the first tick a door
/// is seen so that loading a scenario is silent.
pub struct DoorSoundsPostStep {
    prev: HashMap<DoorId, DoorStatus>,
    /// Doors that were moving under power; a loss of power thumps them once.
    armed: HashSet<DoorId>,
}

impl DoorSoundsPostStep {
    pub fn new() -> Self {
        Self {
            prev: HashMap::new(),
            armed: HashSet::new(),
        }
    }

    fn play_loop(state: &mut VesselState, id: DoorId, file: &str) {
        let slot = SoundSlot::Hydraulics(id);
        state.sound.load_sound(slot, file, Playback::Global);
        state.sound.play_sound(slot, SoundType::Other, 255, true);
    }

    fn thump(state: &mut VesselState, id: DoorId) {
        state.sound.stop_sound(SoundSlot::Hydraulics(id));
        state.sound.play_sound(SoundSlot::DoorThump, SoundType::Other, 255, false);
    }
}

impl Default for DoorSoundsPostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for DoorSoundsPostStep {
    fn name(&self) -> &'static str {
        "DoorSounds"
    }

    fn step(&mut self, _ctx: &StepContext<'_>, state: &mut VesselState) {
        let hydraulics = state.hydraulics_online();
        for id in state.fitted_doors() {
            let Some(spec) = state.door_spec(id).cloned() else {
                continue;
            };
            let status = state.door_status(id);
            let prev = self.prev.insert(id, status);
            let Some(prev) = prev.filter(|p| *p != DoorStatus::NotSet) else {
                continue;
            };

            let powered = !spec.requires_hydraulics || hydraulics;
            let loop_file = if spec.requires_hydraulics {
                files::HYDRAULICS
            } else {
                files::CHAMBER_PRESSURE
            };

            // without pressure a moving door is arrested; stops and
            // failures are still announced below
            if !powered && status.is_moving() {
                if self.armed.remove(&id) {
                    Self::thump(state, id);
                }
                continue;
            }

            if status.is_moving() {
                if !state.sound.is_playing(SoundSlot::Hydraulics(id)) {
                    Self::play_loop(state, id, loop_file);
                }
                self.armed.insert(id);
            }

            if status == prev {
                continue;
            }
            match status {
                DoorStatus::Opening | DoorStatus::Closing => {
                    let message = spec.departure_message(status == DoorStatus::Opening);
                    state.show_info(None, SoundType::None, &message);
                }
                DoorStatus::Open | DoorStatus::Closed => {
                    self.armed.remove(&id);
                    Self::thump(state, id);
                    let message = spec.arrival_message(status == DoorStatus::Open);
                    state.show_info(None, SoundType::InformationCallout, &message);
                }
                _ => {
                    self.armed.remove(&id);
                    state.sound.stop_sound(SoundSlot::Hydraulics(id));
                }
            }
        }
    }
}

// ============================================================================
// DECOMPRESSION
// ============================================================================

/// Both airlock doors open in vacuum vents the cabin.
pub struct AirlockDecompressionPostStep;

impl PrePostStep for AirlockDecompressionPostStep {
    fn name(&self) -> &'static str {
        "AirlockDecompression"
    }

    fn step(&mut self, _ctx: &StepContext<'_>, state: &mut VesselState) {
        let doors_open = state.door_proc(DoorId::OuterAirlock) > DECOMPRESSION_PROC
            && state.door_proc(DoorId::InnerAirlock) > DECOMPRESSION_PROC;
        if doors_open
            && state.cabin_o2 > 0.0
            && state.flight.static_pressure < EARTH_ATM_PRESSURE_THRESHOLD
            && !state.flight.docked
        {
            state.decompress_cabin();
        }
    }
}
