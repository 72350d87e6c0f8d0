//! Vessel configuration loading.
//!
//! The three built-in vessel types are embedded from `data/*.json`. Custom
//! configurations load from any reader through [`load_vessel_config`].
//! Either way the result is validated and out-of-range settings are
//! clamped with a warning.

use std::io::Read;

use xrvessel_logic::config::{ConfigInvalid, VesselConfig, VesselType};

const XR1_JSON: &str = include_str!("../../../data/xr1.json");
const XR2_JSON: &str = include_str!("../../../data/xr2.json");
const XR5_JSON: &str = include_str!("../../../data/xr5.json");

/// Errors that can occur while loading a vessel configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(ConfigInvalid),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<ConfigInvalid> for ConfigError {
    fn from(e: ConfigInvalid) -> Self {
        ConfigError::Invalid(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid vessel config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for one of the built-in vessel types.
pub fn builtin_config(vessel_type: VesselType) -> Result<VesselConfig, ConfigError> {
    let json = match vessel_type {
        VesselType::Xr1 => XR1_JSON,
        VesselType::Xr2 => XR2_JSON,
        VesselType::Xr5 => XR5_JSON,
    };
    parse_config(json)
}

/// Load and validate a configuration from JSON.
pub fn load_vessel_config<R: Read>(mut reader: R) -> Result<VesselConfig, ConfigError> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_config(&json)
}

fn parse_config(json: &str) -> Result<VesselConfig, ConfigError> {
    let mut config: VesselConfig = serde_json::from_str(json)?;
    for adj in config.validate()? {
        log::warn!(
            "{}: {} out of range ({}), using {}",
            config.vessel_type.name(),
            adj.field,
            adj.found,
            adj.used
        );
    }
    log::debug!("loaded {} config with {} doors", config.vessel_type.name(), config.doors.len());
    Ok(config)
}
