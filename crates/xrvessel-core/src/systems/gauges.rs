//! Gauge post-steps: acceleration scale, slope and interval timers.

use xrvessel_logic::gauges::{AccScaleSelector, SlopeEstimator};

use super::{PrePostStep, StepContext};
use crate::vessel::VesselState;

const SECONDS_PER_DAY: f64 = 86400.0;

pub struct ComputeAccPostStep {
    selector: AccScaleSelector,
}

impl ComputeAccPostStep {
    pub fn new() -> Self {
        Self {
            selector: AccScaleSelector::new(),
        }
    }
}

impl Default for ComputeAccPostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for ComputeAccPostStep {
    fn name(&self) -> &'static str {
        "ComputeAcc"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        // docked vessels report the station's motion; show nothing
        let acc = if state.flight.docked {
            [0.0; 3]
        } else {
            state.flight.acc
        };
        state.gauges.acc_scale = self.selector.update(ctx.simt, acc, state.flight.ground_contact);
    }
}

pub struct SetSlopePostStep {
    estimator: SlopeEstimator,
}

impl SetSlopePostStep {
    pub fn new() -> Self {
        Self {
            estimator: SlopeEstimator::default(),
        }
    }
}

impl Default for SetSlopePostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for SetSlopePostStep {
    fn name(&self) -> &'static str {
        "SetSlope"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        let flight = &state.flight;
        state.gauges.slope = self
            .estimator
            .update(ctx.simt, flight.altitude, flight.airspeed, flight.ground_contact);
    }
}

/// Advances the running MDA stopwatches.
pub struct UpdateIntervalTimersPostStep;

impl PrePostStep for UpdateIntervalTimersPostStep {
    fn name(&self) -> &'static str {
        "UpdateIntervalTimers"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        let days = ctx.simdt / SECONDS_PER_DAY;
        for timer in state.timers.iter_mut().filter(|t| t.running) {
            timer.elapsed_days += days;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FlightState;
    use crate::sound::SilentSound;
    use crate::subsystems::SubsystemTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xrvessel_logic::config::VesselType;
    use xrvessel_logic::constants::G;
    use xrvessel_logic::gauges::AccScale;

    fn setup() -> (VesselState, SubsystemTable) {
        let config = crate::config::builtin_config(VesselType::Xr2).expect("builtin config");
        let table = SubsystemTable::for_config(&config);
        let s = VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(4));
        (s, table)
    }

    #[test]
    fn test_acc_scale_zero_when_docked() {
        let (mut s, table) = setup();
        let ctx = StepContext {
            simt: 1.0,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        s.flight.acc = [0.0, 0.0, 6.0 * G];
        s.flight.docked = true;
        ComputeAccPostStep::new().step(&ctx, &mut s);
        assert_eq!(s.gauges.acc_scale, AccScale::TwoG);

        s.flight.docked = false;
        ComputeAccPostStep::new().step(&ctx, &mut s);
        assert_eq!(s.gauges.acc_scale, AccScale::EightG);
    }

    #[test]
    fn test_slope_zero_on_ground() {
        let (mut s, table) = setup();
        s.flight = FlightState::landed();
        s.gauges.slope = 0.3;
        let ctx = StepContext {
            simt: 1.0,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        SetSlopePostStep::new().step(&ctx, &mut s);
        assert_eq!(s.gauges.slope, 0.0);
    }

    #[test]
    fn test_only_running_timers_advance() {
        let (mut s, table) = setup();
        s.timers[1].running = true;
        let ctx = StepContext {
            simt: 1.0,
            simdt: 43200.0,
            mjd: 0.0,
            subsystems: &table,
        };
        UpdateIntervalTimersPostStep.step(&ctx, &mut s);
        assert_eq!(s.timers[0].elapsed_days, 0.0);
        assert!((s.timers[1].elapsed_days - 0.5).abs() < 1e-12);
    }
}
