//! Auto-centering of the centre of lift, hover balance and SCRAM gimbals.

use xrvessel_logic::constants::centering::{
    COL_MAX_SHIFT, COL_SHIFT_RATE, HOVER_BALANCE_SPEED, MAX_HOVER_BALANCE, NEUTRAL_CENTER_OF_LIFT,
    SCRAM_GIMBAL_LIMIT, SCRAM_GIMBAL_SPEED,
};

use super::{PrePostStep, StepContext};
use crate::vessel::VesselState;

/// Move `value` toward `target` by at most `delta` without overshooting.
fn approach(value: f64, target: f64, delta: f64) -> f64 {
    if value > target {
        (value - delta).max(target)
    } else {
        (value + delta).min(target)
    }
}

/// Drives each engaged centering mode back to neutral. A mode switches off
/// when it gets there or when hydraulic pressure is missing.
pub struct AutoCenteringPostStep;

impl AutoCenteringPostStep {
    fn center_of_gravity(simdt: f64, state: &mut VesselState) {
        if !state.centering.cog_center_mode {
            state.centering.cog_force_recenter = false;
            return;
        }
        // an autopilot recenter only checks quietly
        let noisy = !state.centering.cog_force_recenter;
        if !state.check_hydraulic_pressure(noisy, noisy) {
            state.centering.cog_center_mode = false;
            return;
        }

        let c = &mut state.centering;
        c.center_of_lift = approach(c.center_of_lift, NEUTRAL_CENTER_OF_LIFT, COL_SHIFT_RATE * simdt)
            .clamp(-COL_MAX_SHIFT, COL_MAX_SHIFT);
        if c.center_of_lift == NEUTRAL_CENTER_OF_LIFT {
            c.cog_center_mode = false;
            c.cog_force_recenter = false;
        }
        state.mark_apu_active();
    }

    fn hover_balance(simdt: f64, state: &mut VesselState) {
        if !state.centering.hover_center_mode {
            return;
        }
        if !state.check_hydraulic_pressure(true, true) {
            state.centering.hover_center_mode = false;
            return;
        }

        let c = &mut state.centering;
        c.hover_balance =
            approach(c.hover_balance, 0.0, HOVER_BALANCE_SPEED * simdt).clamp(-MAX_HOVER_BALANCE, MAX_HOVER_BALANCE);
        if c.hover_balance == 0.0 {
            c.hover_center_mode = false;
        }
        state.mark_apu_active();
    }

    fn scram_gimbals(simdt: f64, state: &mut VesselState) {
        if !state.centering.scram_center_mode {
            return;
        }
        if !state.check_hydraulic_pressure(true, true) {
            state.centering.scram_center_mode = false;
            return;
        }

        let c = &mut state.centering;
        for gimbal in c.scram_gimbal.iter_mut() {
            *gimbal = approach(*gimbal, 0.0, SCRAM_GIMBAL_SPEED * simdt).clamp(-SCRAM_GIMBAL_LIMIT, SCRAM_GIMBAL_LIMIT);
        }
        if c.scram_gimbal.iter().all(|g| *g == 0.0) {
            c.scram_center_mode = false;
        }
        state.mark_apu_active();
    }
}

impl PrePostStep for AutoCenteringPostStep {
    fn name(&self) -> &'static str {
        "AutoCentering"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        Self::center_of_gravity(ctx.simdt, state);
        Self::hover_balance(ctx.simdt, state);
        Self::scram_gimbals(ctx.simdt, state);
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
    use xrvessel_logic::door::DoorStatus;

    fn setup() -> (VesselState, SubsystemTable) {
        let config = crate::config::builtin_config(VesselType::Xr2).expect("builtin config");
        let table = SubsystemTable::for_config(&config);
        let mut s = VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(31));
        s.apu.status = DoorStatus::Open;
        (s, table)
    }

    fn tick(table: &SubsystemTable, s: &mut VesselState) {
        let ctx = StepContext {
            simt: 5.0,
            simdt: 1.0,
            mjd: 0.0,
            subsystems: table,
        };
        AutoCenteringPostStep.step(&ctx, s);
    }

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach(0.5, 0.0, 1.0), 0.0);
        assert_eq!(approach(-0.5, 0.0, 1.0), 0.0);
        assert!((approach(3.0, 0.0, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_center_of_lift_recenters_then_stops() {
        let (mut s, table) = setup();
        s.centering.center_of_lift = 2.0;
        s.centering.cog_center_mode = true;
        tick(&table, &mut s);
        assert!((s.centering.center_of_lift - (2.0 - COL_SHIFT_RATE)).abs() < 1e-12);
        assert!(s.centering.cog_center_mode);
        tick(&table, &mut s);
        assert_eq!(s.centering.center_of_lift, 0.0);
        assert!(!s.centering.cog_center_mode);
    }

    #[test]
    fn test_mode_drops_without_hydraulics() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Closed;
        s.centering.hover_balance = 0.03;
        s.centering.hover_center_mode = true;
        tick(&table, &mut s);
        assert!(!s.centering.hover_center_mode);
        assert_eq!(s.centering.hover_balance, 0.03);
        assert!(s.notifier.text.contains("WARNING: APU is offline; no hydraulic"));
    }

    #[test]
    fn test_forced_recenter_is_silent() {
        let (mut s, table) = setup();
        s.apu.status = DoorStatus::Closed;
        s.centering.center_of_lift = 1.0;
        s.centering.cog_center_mode = true;
        s.centering.cog_force_recenter = true;
        tick(&table, &mut s);
        assert!(!s.centering.cog_center_mode);
        assert!(s.notifier.text.is_empty());

        tick(&table, &mut s);
        assert!(!s.centering.cog_force_recenter);
    }

    #[test]
    fn test_scram_gimbals_center_together() {
        let (mut s, table) = setup();
        s.centering.scram_gimbal = [SCRAM_GIMBAL_LIMIT, -SCRAM_GIMBAL_SPEED * 0.5];
        s.centering.scram_center_mode = true;
        tick(&table, &mut s);
        assert_eq!(s.centering.scram_gimbal[1], 0.0);
        assert!(s.centering.scram_gimbal[0] > 0.0);
        assert!(s.centering.scram_center_mode);
        for _ in 0..10 {
            tick(&table, &mut s);
        }
        assert_eq!(s.centering.scram_gimbal, [0.0, 0.0]);
        assert!(!s.centering.scram_center_mode);
    }
}
