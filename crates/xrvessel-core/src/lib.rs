//! XR Vessel Core - Door and System Lifecycle Engine
//!
//! Drives the doors, APU, hydraulics, coolant loop, damage model and
//! warning layer of one XR-family vessel, one simulator tick at a time.
//!
//! # Architecture
//!
//! - **Entities**: one hecs entity per fitted door, carrying a [`components::Door`]
//! - **Resources**: vessel-wide singletons (APU, crew, thermal state) on [`vessel::VesselState`]
//! - **Systems**: ordered [`systems::PrePostStep`] units run before and after the host's physics
//! - **Subsystems**: per-door interlocks and cascades in a [`subsystems::SubsystemTable`]
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | Door component and vessel resource structs |
//! | [`config`] | Built-in and custom vessel configurations |
//! | [`damage`] | Damage table, failure checks, crash handling |
//! | [`engine`] | [`engine::VesselController`], the host's entry point |
//! | [`hydraulics`] | APU/hydraulic pressure gate |
//! | [`notify`] | Warning debounce and info channel |
//! | [`persistence`] | Binary snapshots and scenario text lines |
//! | [`sound`] | Sound engine seam and cue files |
//! | [`subsystems`] | Door activation path and per-door behaviour |
//! | [`systems`] | Pre- and post-step units |
//! | [`vessel`] | The state aggregate |
//!
//! # Example
//!
//! ```rust,no_run
//! use xrvessel_core::prelude::*;
//!
//! let mut vessel = VesselController::for_type(VesselType::Xr1).expect("built-in config");
//! vessel.state_mut().flight = FlightState::landed();
//! vessel.activate_apu(DoorStatus::Opening);
//!
//! let simdt = 1.0 / 60.0;
//! let mut simt = 0.0;
//! loop {
//!     vessel.pre_step(simt, simdt, 51544.5);
//!     // host physics runs here and writes the flight state
//!     vessel.post_step(simt, simdt, 51544.5);
//!     simt += simdt;
//! }
//! ```

pub mod components;
pub mod config;
pub mod damage;
pub mod engine;
pub mod hydraulics;
pub mod notify;
pub mod persistence;
pub mod sound;
pub mod subsystems;
pub mod systems;
pub mod vessel;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::VesselController;
    pub use crate::sound::{ClipSound, SilentSound, SoundEngine};
    pub use crate::subsystems::{ActivationOutcome, Rejection};
    pub use crate::vessel::{VesselError, VesselState};
    pub use xrvessel_logic::config::VesselType;
    pub use xrvessel_logic::damage::DamageItem;
    pub use xrvessel_logic::door::{DoorId, DoorStatus};
}
