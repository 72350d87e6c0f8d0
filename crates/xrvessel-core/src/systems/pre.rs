//! Pre-steps: run before the host integrates physics.

use super::{PrePostStep, StepContext};
use crate::vessel::VesselState;

/// Refreshes hydraulic availability once per tick for everything that polls it.
pub struct HydraulicPressurePreStep {
    initialized: bool,
}

impl HydraulicPressurePreStep {
    pub fn new() -> Self {
        Self { initialized: false }
    }
}

impl Default for HydraulicPressurePreStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for HydraulicPressurePreStep {
    fn name(&self) -> &'static str {
        "HydraulicPressure"
    }

    fn step(&mut self, _ctx: &StepContext<'_>, state: &mut VesselState) {
        let available = state.refresh_hydraulics();
        if self.initialized && available != state.previous.hydraulics_available {
            if available {
                log::debug!("hydraulic pressure up");
            } else {
                log::debug!("hydraulic pressure lost (APU {})", state.apu.status.token());
            }
        }
        self.initialized = true;
    }
}

/// Snapshots values for next tick's edge detection. Must run last.
pub struct UpdatePreviousFieldsPreStep;

impl PrePostStep for UpdatePreviousFieldsPreStep {
    fn name(&self) -> &'static str {
        "UpdatePreviousFields"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        state.previous.simt = ctx.simt;
        state.previous.ground_contact = state.flight.ground_contact;
        state.previous.hydraulics_available = state.hydraulics.available;
        state.previous.apu_status = state.apu.status;
    }
}
