//! Per-tick damage checks and master warning upkeep.

use super::{PrePostStep, StepContext};
use crate::vessel::VesselState;

/// Damage checks are skipped for this long after startup unless crashed (s).
const STARTUP_GRACE_SIMT: f64 = 2.0;

/// Wing stress, door stress and hull heating, each behind its setting.
/// A crash wrecks everything exactly once and skips the rest.
pub struct DamagePostStep;

impl PrePostStep for DamagePostStep {
    fn name(&self) -> &'static str {
        "Damage"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        if !state.is_crashed() && ctx.simt < STARTUP_GRACE_SIMT {
            return;
        }

        let mut new_damage = false;
        if state.is_crashed() {
            if !state.crash.processed {
                state.perform_crash_damage();
                new_damage = true;
            }
        } else {
            let settings = state.config.settings.clone();
            if settings.wing_stress_damage_enabled {
                new_damage |= state.check_wing_stress(ctx.simdt);
            }
            if settings.door_stress_damage_enabled {
                new_damage |= ctx.subsystems.check_all_door_damage(state);
            }
            if settings.hull_heating_damage_enabled {
                new_damage |= state.check_hull_heating_damage(ctx.simdt);
            }
        }

        if new_damage {
            state.mws.active = true;
        }
        if !state.is_warning_present() {
            state.mws.active = false;
        }
    }
}
