//! Vessel controller - main entry point for hosting a vessel

use std::io::{BufRead, Read, Write};

use rand::rngs::StdRng;
use rand::SeedableRng;
use xrvessel_logic::config::{VesselConfig, VesselType};
use xrvessel_logic::damage::DamageItem;
use xrvessel_logic::door::{DoorId, DoorStatus};

use crate::config::{builtin_config, ConfigError};
use crate::persistence::{self, SaveError};
use crate::sound::SoundEngine;
use crate::subsystems::{ActivationOutcome, SubsystemTable};
use crate::systems::{default_post_steps, default_pre_steps, PrePostStep, StepContext};
use crate::vessel::{VesselError, VesselState};

/// One vessel plus everything that drives it each tick.
pub struct VesselController {
    state: VesselState,
    subsystems: SubsystemTable,
    pre_steps: Vec<Box<dyn PrePostStep>>,
    post_steps: Vec<Box<dyn PrePostStep>>,
}

impl VesselController {
    /// Create a controller with a silent sound engine and an entropy-seeded RNG
    pub fn new(config: VesselConfig) -> Self {
        Self::from_state(VesselState::new(config))
    }

    /// Deterministic controller: same seed, same inputs, same vessel.
    pub fn with_seed(config: VesselConfig, sound: Box<dyn SoundEngine>, seed: u64) -> Self {
        Self::from_state(VesselState::with_parts(config, sound, StdRng::seed_from_u64(seed)))
    }

    /// Controller for one of the built-in vessel types
    pub fn for_type(vessel_type: VesselType) -> Result<Self, ConfigError> {
        Ok(Self::new(builtin_config(vessel_type)?))
    }

    fn from_state(state: VesselState) -> Self {
        let subsystems = SubsystemTable::for_config(&state.config);
        log::info!(
            "{} controller ready: {} doors, {} damage items",
            state.config.vessel_type.name(),
            subsystems.len(),
            state.damage_items().len()
        );
        Self {
            state,
            subsystems,
            pre_steps: default_pre_steps(),
            post_steps: default_post_steps(),
        }
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Run the pre-steps. The host integrates physics afterwards.
    pub fn pre_step(&mut self, simt: f64, simdt: f64, mjd: f64) {
        self.state.simt = simt;
        let ctx = StepContext {
            simt,
            simdt,
            mjd,
            subsystems: &self.subsystems,
        };
        for step in self.pre_steps.iter_mut() {
            step.step(&ctx, &mut self.state);
        }
    }

    /// Run the post-steps against the flight state the host wrote.
    pub fn post_step(&mut self, simt: f64, simdt: f64, mjd: f64) {
        self.state.simt = simt;
        self.state.sound.update(simt);
        let ctx = StepContext {
            simt,
            simdt,
            mjd,
            subsystems: &self.subsystems,
        };
        for step in self.post_steps.iter_mut() {
            step.step(&ctx, &mut self.state);
        }
    }

    /// Both halves back to back, for headless use.
    pub fn update(&mut self, simt: f64, simdt: f64, mjd: f64) {
        self.pre_step(simt, simdt, mjd);
        self.post_step(simt, simdt, mjd);
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Request a door move toward `target` through the interlocks.
    pub fn activate(&mut self, id: DoorId, target: DoorStatus) -> Result<ActivationOutcome, VesselError> {
        self.subsystems.activate(&mut self.state, id, target)
    }

    pub fn toggle(&mut self, id: DoorId) -> Result<ActivationOutcome, VesselError> {
        self.subsystems.toggle(&mut self.state, id)
    }

    /// Set a door's status with no checks (autopilots, scenario fixes).
    pub fn force_activate(&mut self, id: DoorId, target: DoorStatus) -> Result<(), VesselError> {
        self.subsystems.force_activate(&mut self.state, id, target)
    }

    pub fn activate_apu(&mut self, target: DoorStatus) -> ActivationOutcome {
        self.state.activate_apu(target)
    }

    pub fn toggle_apu(&mut self) -> ActivationOutcome {
        self.state.toggle_apu()
    }

    pub fn repair(&mut self, item: DamageItem) -> Result<(), VesselError> {
        self.state.repair(item)
    }

    pub fn repair_all(&mut self) {
        self.state.repair_all();
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Save the complete vessel to a writer
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_vessel(writer, &self.state)
    }

    /// Load a vessel saved by [`save`](Self::save). Per-tick edge detection
    /// starts over.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        persistence::load_vessel(reader)?.restore(&mut self.state)?;
        self.reset_steps();
        Ok(())
    }

    pub fn save_scenario<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        persistence::write_scenario(writer, &self.state)
    }

    /// Returns the number of malformed lines skipped.
    pub fn load_scenario<R: BufRead>(&mut self, reader: &mut R) -> std::io::Result<usize> {
        let skipped = persistence::read_scenario(reader, &mut self.state)?;
        self.reset_steps();
        Ok(skipped)
    }

    fn reset_steps(&mut self) {
        self.pre_steps = default_pre_steps();
        self.post_steps = default_post_steps();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> &VesselState {
        &self.state
    }

    /// Host inputs (flight state, crew) are written through here.
    pub fn state_mut(&mut self) -> &mut VesselState {
        &mut self.state
    }

    pub fn subsystems(&self) -> &SubsystemTable {
        &self.subsystems
    }
}
