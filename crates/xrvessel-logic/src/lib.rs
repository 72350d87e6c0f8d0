//! Pure vessel logic for the XR vessel family.
//!
//! This crate contains the logic that is independent of any simulator host,
//! sound engine or entity store. Functions take plain data and return
//! results, so they are unit-testable and shared by the engine in
//! `xrvessel-core` and the headless harness in `xrvessel-simtest`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Per-vessel-type data: door table, hull limits, APU capacity, settings |
//! | [`constants`] | Family-wide thresholds and rates (coolant, hull, APU, centering) |
//! | [`damage`] | Damage items, their labels, warning lights |
//! | [`door`] | Door status enum, travel direction, proc integration |
//! | [`gauges`] | Acceleration gauge scale selection and slope estimation |
//! | [`rolling`] | Fixed-capacity rolling sample buffer |
//! | [`scenario`] | Scenario `KEY value` line parsing and formatting |
//! | [`thermal`] | Coolant loop and hull heating models |

pub mod config;
pub mod constants;
pub mod damage;
pub mod door;
pub mod gauges;
pub mod rolling;
pub mod scenario;
pub mod thermal;
