//! Systems - per-tick units run before and after the host's physics step
//!
//! Each unit is a [`PrePostStep`]. The controller owns two ordered lists
//! built by [`default_pre_steps`] and [`default_post_steps`]; the order is
//! part of the behaviour (warnings queued late in one tick play early in the
//! next, doors move before their sounds are picked).

mod apu;
mod centering;
mod damage;
mod doors;
mod gauges;
mod pre;
mod thermal;
mod warnings;

pub use apu::*;
pub use centering::*;
pub use damage::*;
pub use doors::*;
pub use gauges::*;
pub use pre::*;
pub use thermal::*;
pub use warnings::*;

use crate::subsystems::SubsystemTable;
use crate::vessel::VesselState;

/// Timing for the current tick plus the vessel's subsystem table.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub simt: f64,
    pub simdt: f64,
    pub mjd: f64,
    pub subsystems: &'a SubsystemTable,
}

/// A unit of per-tick work. Units keep their own edge-detection state.
pub trait PrePostStep: Send {
    fn name(&self) -> &'static str;
    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState);
}

/// Pre-steps, in execution order. `UpdatePreviousFieldsPreStep` must stay last.
pub fn default_pre_steps() -> Vec<Box<dyn PrePostStep>> {
    vec![
        Box::new(HydraulicPressurePreStep::new()),
        Box::new(UpdatePreviousFieldsPreStep),
    ]
}

/// Post-steps, in execution order.
pub fn default_post_steps() -> Vec<Box<dyn PrePostStep>> {
    vec![
        Box::new(ComputeAccPostStep::new()),
        Box::new(ShowWarningPostStep::new()),
        Box::new(SetHullTempsPostStep::new()),
        Box::new(SetSlopePostStep::new()),
        Box::new(DoorDriverPostStep),
        Box::new(DoorSoundsPostStep::new()),
        Box::new(UpdateIntervalTimersPostStep),
        Box::new(ApuPostStep::new()),
        Box::new(UpdateCoolantTempPostStep::new()),
        Box::new(AirlockDecompressionPostStep),
        Box::new(AutoCenteringPostStep),
        Box::new(ResetApuTimerForPolledSystemsPostStep),
        Box::new(DamagePostStep),
        Box::new(ManageMwsPostStep),
    ]
}
