//! APU fuel, power-up/power-down timing and the idle-load nag.

use xrvessel_logic::constants::apu::{LOW_FUEL_FRAC, STARTUP_SECONDS};
use xrvessel_logic::door::DoorStatus;

use super::{PrePostStep, StepContext};
use crate::sound::{files, Playback, SoundSlot, SoundType};
use crate::vessel::VesselState;

/// Fuel fractions announced on the way down, highest first.
const FUEL_CALLOUTS: [f64; 13] = [0.90, 0.80, 0.70, 0.60, 0.50, 0.40, 0.30, 0.20, 0.10, 0.04, 0.03, 0.02, 0.01];

/// Dynamic pressure (Pa) above which control surfaces come on with the APU.
const AF_CTRL_DYNAMIC_PRESSURE: f64 = 5.0e3;

/// Runs the APU as a timed device.
///
/// `Opening` becomes `Open` [`STARTUP_SECONDS`] after power-up starts and
/// `Closing` becomes `Closed` the same time after power-down starts. The
/// first tick only records the status, so a loaded scenario is quiet.
pub struct ApuPostStep {
    prev_status: DoorStatus,
    target_simt: f64,
    /// Fuel at the previous tick; negative until the first tick has run.
    prev_qty: f64,
    first_step: bool,
    powering: bool,
    surfaces_checked: bool,
}

impl ApuPostStep {
    pub fn new() -> Self {
        Self {
            prev_status: DoorStatus::NotSet,
            target_simt: 0.0,
            prev_qty: -1.0,
            first_step: true,
            powering: false,
            surfaces_checked: false,
        }
    }

    fn burn_fuel(&mut self, simdt: f64, state: &mut VesselState) {
        if state.apu.is_running() && state.apu.fuel_qty_kg > 0.0 {
            let kg_per_sec = state.config.settings.apu_burn_kg_per_min() / 60.0;
            state.apu.fuel_qty_kg = (state.apu.fuel_qty_kg - kg_per_sec * simdt).max(0.0);
        }

        let capacity = state.config.apu_fuel_capacity_kg;
        let prev_frac = self.prev_qty / capacity;
        let frac = state.apu_fuel_frac();

        if self.prev_qty >= 0.0 {
            if frac >= 1.0 && prev_frac < 1.0 {
                state.show_info(
                    Some(files::APU_FUEL_FULL),
                    SoundType::InformationCallout,
                    "APU fuel tanks full.",
                );
            } else if frac <= 0.0 && prev_frac > 0.0 {
                log::warn!("APU fuel depleted");
                state.show_warning(
                    Some(files::APU_FUEL_DEPLETED),
                    SoundType::WarningCallout,
                    "APU fuel tanks depleted:&NO HYDRAULIC PRESSURE!",
                    false,
                );
                state.mws.active = true;
                if state.apu.status == DoorStatus::Open {
                    state.apu.status = DoorStatus::Closing;
                }
            } else if frac <= LOW_FUEL_FRAC && prev_frac > LOW_FUEL_FRAC {
                state.show_warning(Some(files::APU_FUEL_LOW), SoundType::WarningCallout, "APU fuel low", false);
                state.mws.active = true;
            } else {
                Self::fuel_callout(state, frac, prev_frac);
            }
            state.apu.warning = frac < LOW_FUEL_FRAC;
        }
        self.prev_qty = state.apu.fuel_qty_kg;
    }

    fn fuel_callout(state: &mut VesselState, frac: f64, prev_frac: f64) {
        for callout in FUEL_CALLOUTS {
            if frac <= callout && prev_frac > callout {
                let percent = (callout * 100.0).round() as u32;
                if frac <= LOW_FUEL_FRAC {
                    let file = format!("Warning APU Fuel {} Percent.wav", percent);
                    let message = format!("Warning: APU fuel at {}%", percent);
                    state.show_warning(Some(&file), SoundType::WarningCallout, &message, false);
                } else {
                    let file = format!("Information APU Fuel {} Percent.wav", percent);
                    let message = format!("APU fuel at {}%", percent);
                    state.show_info(Some(&file), SoundType::InformationCallout, &message);
                }
                break;
            }
            // the rest are all lower than the current level
            if frac > callout {
                break;
            }
        }
    }

    fn update_status(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        if self.first_step {
            self.first_step = false;
            return;
        }

        if self.powering && ctx.simt >= self.target_simt {
            self.powering = false;
            // a failure while spooling wins over the timer
            if state.apu.status != DoorStatus::Failed {
                state.apu.status = if state.apu.status == DoorStatus::Opening {
                    DoorStatus::Open
                } else {
                    DoorStatus::Closed
                };
                if state.apu.status == DoorStatus::Open && state.flight.dynamic_pressure >= AF_CTRL_DYNAMIC_PRESSURE {
                    state.flight.af_ctrl_on = true;
                }
            }
        }

        let status = state.apu.status;
        if status != DoorStatus::Failed && status != self.prev_status {
            log::debug!("APU {}", status.token());
            match status {
                DoorStatus::Opening => {
                    state.sound.stop_sound(SoundSlot::ApuShutdown);
                    Self::play(state, SoundSlot::ApuStartup, files::APU_STARTUP, false);
                    self.target_simt = ctx.simt + STARTUP_SECONDS;
                    self.powering = true;
                    state.show_info(None, SoundType::None, "APU powering up.");
                }
                DoorStatus::Closing => {
                    state.sound.stop_sound(SoundSlot::ApuRun);
                    state.sound.stop_sound(SoundSlot::ApuStartup);
                    Self::play(state, SoundSlot::ApuShutdown, files::APU_SHUTDOWN, false);
                    self.target_simt = ctx.simt + STARTUP_SECONDS;
                    self.powering = true;
                    state.show_info(None, SoundType::None, "APU powering down.");
                }
                DoorStatus::Open => {
                    Self::play(state, SoundSlot::ApuRun, files::APU_RUN, true);
                    if self.prev_status != DoorStatus::NotSet {
                        state.show_info(None, SoundType::None, "APU online.");
                    }
                }
                DoorStatus::Closed => {
                    state.sound.stop_sound(SoundSlot::ApuRun);
                    if self.prev_status != DoorStatus::NotSet {
                        state.show_info(None, SoundType::None, "APU offline.");
                    }
                }
                _ => {}
            }
        }
        self.prev_status = status;
    }

    fn play(state: &mut VesselState, slot: SoundSlot, file: &str, looping: bool) {
        state.sound.load_sound(slot, file, Playback::InternalOnly);
        state.sound.play_sound(slot, SoundType::Other, 255, looping);
    }

    fn check_idle(ctx: &StepContext<'_>, state: &mut VesselState) {
        let settings = &state.config.settings;
        let idle_limit = settings.apu_idle_runtime_callouts;
        if idle_limit <= 0.0 || settings.apu_burn_kg_per_min() <= 0.0 || state.apu.status != DoorStatus::Open {
            return;
        }
        if ctx.simt - state.hydraulics.last_active_simt >= idle_limit {
            state.show_warning(
                Some(files::APU_NO_LOAD),
                SoundType::WarningCallout,
                "Alert: APU running with no load.",
                false,
            );
            state.mark_apu_active();
        }
    }

    /// No hydraulic pressure, no control surfaces.
    fn disable_surfaces(&mut self, state: &mut VesselState) {
        if state.apu.status != DoorStatus::Open && state.flight.af_ctrl_on {
            if self.surfaces_checked {
                let warn = state.flight.dynamic_pressure > 5.0 && !state.flight.ground_contact;
                state.check_hydraulic_pressure(warn, warn);
            }
            state.flight.af_ctrl_on = false;
        }
        self.surfaces_checked = true;
    }
}

impl Default for ApuPostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for ApuPostStep {
    fn name(&self) -> &'static str {
        "Apu"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        let settings = &state.config.settings;
        if !state.flight.has_focus
            && settings.apu_auto_shutdown
            && settings.apu_burn_kg_per_min() > 0.0
            && !state.centering.cog_auto_mode
            && state.apu.is_running()
        {
            log::info!("APU auto-shutdown: vessel lost focus");
            state.activate_apu(DoorStatus::Closing);
        }

        self.burn_fuel(ctx.simdt, state);
        self.update_status(ctx, state);

        if state.flight.af_ctrl_on {
            state.mark_apu_active();
        } else {
            Self::check_idle(ctx, state);
        }
        self.disable_surfaces(state);
    }
}

/// Keeps the idle nag quiet while polled systems are drawing hydraulic power.
pub struct ResetApuTimerForPolledSystemsPostStep;

impl PrePostStep for ResetApuTimerForPolledSystemsPostStep {
    fn name(&self) -> &'static str {
        "ResetApuTimerForPolledSystems"
    }

    fn step(&mut self, _ctx: &StepContext<'_>, state: &mut VesselState) {
        if state.centering.cog_auto_mode || state.flight.wheel_brake > 0.0 {
            state.mark_apu_active();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::SilentSound;
    use crate::subsystems::SubsystemTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xrvessel_logic::config::VesselType;

    fn setup() -> (VesselState, SubsystemTable) {
        let config = crate::config::builtin_config(VesselType::Xr1).expect("builtin config");
        let table = SubsystemTable::for_config(&config);
        let s = VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(21));
        (s, table)
    }

    fn run(step: &mut ApuPostStep, table: &SubsystemTable, s: &mut VesselState, simt: f64, simdt: f64) {
        s.simt = simt;
        let ctx = StepContext {
            simt,
            simdt,
            mjd: 0.0,
            subsystems: table,
        };
        step.step(&ctx, s);
    }

    #[test]
    fn test_power_up_takes_startup_seconds() {
        let (mut s, table) = setup();
        let mut step = ApuPostStep::new();
        run(&mut step, &table, &mut s, 0.0, 0.1);
        run(&mut step, &table, &mut s, 0.1, 0.1);
        assert!(!s.notifier.text.contains("APU offline."));

        s.activate_apu(DoorStatus::Opening);
        run(&mut step, &table, &mut s, 1.0, 0.1);
        assert!(s.notifier.text.contains("APU powering up."));
        run(&mut step, &table, &mut s, 3.4, 0.1);
        assert_eq!(s.apu.status, DoorStatus::Opening);
        run(&mut step, &table, &mut s, 3.5, 0.1);
        assert_eq!(s.apu.status, DoorStatus::Open);
        assert!(s.notifier.text.contains("APU online."));
    }

    #[test]
    fn test_failure_while_powering_up_sticks() {
        let (mut s, table) = setup();
        let mut step = ApuPostStep::new();
        run(&mut step, &table, &mut s, 0.0, 0.1);
        s.activate_apu(DoorStatus::Opening);
        run(&mut step, &table, &mut s, 1.0, 0.1);
        s.apu.status = DoorStatus::Failed;
        run(&mut step, &table, &mut s, 3.5, 0.1);
        assert_eq!(s.apu.status, DoorStatus::Failed);
        assert!(!s.notifier.text.contains("APU online."));
        run(&mut step, &table, &mut s, 5.0, 0.1);
        assert_eq!(s.apu.status, DoorStatus::Failed);
    }

    #[test]
    fn test_fuel_burns_while_running() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Open;
        let before = s.apu.fuel_qty_kg;
        let mut step = ApuPostStep::new();
        run(&mut step, &table, &mut s, 1.0, 60.0);
        let burned = before - s.apu.fuel_qty_kg;
        assert!((burned - s.config.settings.apu_burn_kg_per_min()).abs() < 1e-9);
    }

    #[test]
    fn test_fuel_callout_and_depletion() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Open;
        let capacity = s.config.apu_fuel_capacity_kg;
        let mut step = ApuPostStep::new();
        s.apu.fuel_qty_kg = capacity * 0.905;
        run(&mut step, &table, &mut s, 1.0, 0.0);
        s.apu.fuel_qty_kg = capacity * 0.895;
        run(&mut step, &table, &mut s, 2.0, 0.0);
        assert!(s.notifier.text.contains("APU fuel at 90%"));

        s.apu.fuel_qty_kg = 0.0;
        run(&mut step, &table, &mut s, 3.0, 0.0);
        assert!(s.notifier.text.contains("APU fuel tanks depleted:"));
        assert_eq!(s.apu.status, DoorStatus::Closing);
        assert!(s.apu.warning);
        assert!(s.mws.active);
    }

    #[test]
    fn test_idle_nag_after_configured_time() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Open;
        let idle = s.config.settings.apu_idle_runtime_callouts;
        let mut step = ApuPostStep::new();
        run(&mut step, &table, &mut s, 1.0, 0.1);
        run(&mut step, &table, &mut s, idle - 1.0, 0.1);
        assert!(!s.notifier.text.contains("Alert: APU running with no load."));
        run(&mut step, &table, &mut s, idle + 0.5, 0.1);
        assert!(s.notifier.text.contains("Alert: APU running with no load."));
        assert_eq!(s.hydraulics.last_active_simt, idle + 0.5);
    }

    #[test]
    fn test_auto_shutdown_without_focus() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Open;
        s.flight.has_focus = false;
        let mut step = ApuPostStep::new();
        run(&mut step, &table, &mut s, 1.0, 0.1);
        assert_eq!(s.apu.status, DoorStatus::Closing);

        s.apu.status = DoorStatus::Open;
        s.centering.cog_auto_mode = true;
        run(&mut step, &table, &mut s, 1.1, 0.1);
        assert_eq!(s.apu.status, DoorStatus::Open);
    }

    #[test]
    fn test_polled_systems_keep_apu_busy() {
        let (mut s, table) = setup();
        s.simt = 42.0;
        s.flight.wheel_brake = 0.5;
        let ctx = StepContext {
            simt: 42.0,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        ResetApuTimerForPolledSystemsPostStep.step(&ctx, &mut s);
        assert_eq!(s.hydraulics.last_active_simt, 42.0);
    }
}
