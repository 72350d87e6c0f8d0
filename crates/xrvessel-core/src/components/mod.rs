//! Component and resource definitions.
//!
//! Doors are hecs entities carrying a [`Door`] component. Everything the
//! vessel has exactly one of (APU, crew, thermal state, lights) is a plain
//! resource struct on [`crate::vessel::VesselState`]. Neither has behaviour;
//! that lives in the post-steps and subsystems.

mod door;
mod vessel;

pub use door::*;
pub use vessel::*;
