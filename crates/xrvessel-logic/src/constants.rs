//! Vessel constants shared by every XR vessel type.
//!
//! Per-type values (door speeds, hull limits, APU capacity) live in
//! [`crate::config::VesselConfig`]; only values common to the whole family
//! are here.

/// Standard gravity in m/s².
pub const G: f64 = 9.80665;

/// Static pressure at or above which the ship counts as "in atmosphere" for
/// airlock and hatch interlocks (Pa).
pub const EARTH_ATM_PRESSURE_THRESHOLD: f64 = 50e3;

/// Kelvin offset for Celsius conversions.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn ctok(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

pub fn ktoc(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub mod coolant {
    /// Nominal (floor) coolant temperature in °C.
    pub const NOMINAL_TEMP: f64 = 31.2;
    pub const WARNING_TEMP: f64 = 80.0;
    pub const CRITICAL_TEMP: f64 = 90.0;
    /// Mean time to internal systems failure at the critical temperature (s).
    pub const MEAN_TIME_TO_FAILURE: f64 = 20.0;
    /// Heating rates in °C/s indexed by the `coolant_heating_rate` setting.
    pub const HEATING_RATES: [f64; 3] = [0.00690887811812889, 0.01515104849, 0.0];
    /// Extra heat while the APU runs.
    pub const APU_HEATING_MODIFIER: f64 = 0.05;
    /// Fraction of the current temperature shed per second with the radiator deployed.
    pub const RADIATOR_COOLING_FRAC: f64 = 4.9751544513792169e-4;
    /// Minimum radiator cooling in °C/s.
    pub const RADIATOR_MIN_COOLING: f64 = 0.015;
    /// External (ground) cooling is this much stronger than the radiator.
    pub const EXTERNAL_COOLING_MULTIPLIER: f64 = 1.27;
}

pub mod hull {
    /// Fraction of a surface limit at which the critical warning sounds.
    pub const CRITICAL_FRAC: f64 = 0.90;
    /// Fraction of the door-open limit at which open doors warn.
    pub const DOOR_OPEN_WARNING_FRAC: f64 = 0.75;
    /// Mean time to heat damage at the limit (s).
    pub const MEAN_TIME_TO_DAMAGE: f64 = 8.0;
    /// Heat conduction cooling starts above this static pressure (Pa).
    pub const MIN_CONDUCTION_PRESSURE: f64 = 7000.0;
    /// Heat conduction cooling stops increasing above this static pressure (Pa).
    pub const MAX_CONDUCTION_PRESSURE: f64 = 97700.0;
    /// Heat fraction remaining at maximum conduction.
    pub const MIN_CONDUCTION_FRAC: f64 = 0.0949622;
    /// Tuning multiplier applied to the per-vessel heating factor.
    pub const HEATING_TUNING: f64 = 0.642;
    /// Fraction of excess heat each surface sheds per second.
    pub const HEAT_DROP_FRAC: f64 = 0.02;
    /// Minimum heat shed per second (K).
    pub const MIN_HEAT_DROP: f64 = 0.1;
    /// Outside air temperature and Mach are valid at or above this static pressure (Pa).
    pub const OAT_VALID_STATIC_PRESSURE: f64 = 0.02;
}

pub mod apu {
    /// Seconds from power-up to online.
    pub const STARTUP_SECONDS: f64 = 2.5;
    /// Fuel burn in kg/min indexed by the `apu_burn_rate` setting.
    pub const BURN_RATES: [f64; 6] = [0.0, 0.90718474, 1.81436948, 2.72155422, 4.08233134, 6.12349701];
    /// Fuel fraction below which the low fuel light is lit.
    pub const LOW_FUEL_FRAC: f64 = 0.05;
}

pub mod wings {
    /// Maximum positive wing load (N/m²).
    pub const MAX_WING_LOAD: f64 = 17e3;
    /// Maximum negative wing load (N/m²).
    pub const MAX_NEGATIVE_WING_LOAD: f64 = -11e3;
    /// Maximum dynamic pressure before airframe stress (Pa).
    pub const MAX_DYNAMIC_PRESSURE: f64 = 150e3;
    /// Fraction of a limit that triggers a stress warning.
    pub const WARNING_FRAC: f64 = 0.85;
}

pub mod centering {
    /// Neutral centre of lift offset (m).
    pub const NEUTRAL_CENTER_OF_LIFT: f64 = 0.0;
    /// Centre of lift shift rate (m/s).
    pub const COL_SHIFT_RATE: f64 = 1.1644;
    /// Maximum centre of lift shift either way (m).
    pub const COL_MAX_SHIFT: f64 = 4.115;
    /// Hover balance shift rate (fraction/s).
    pub const HOVER_BALANCE_SPEED: f64 = 0.02;
    /// Maximum hover balance either way.
    pub const MAX_HOVER_BALANCE: f64 = 0.035;
    /// SCRAM gimbal recentering speed (rad/s).
    pub const SCRAM_GIMBAL_SPEED: f64 = (5.0 * std::f64::consts::PI / 180.0) / 3.0;
    /// Maximum SCRAM gimbal angle either way (rad).
    pub const SCRAM_GIMBAL_LIMIT: f64 = 10.0 * std::f64::consts::PI / 180.0;
}

pub mod gauges {
    /// Seconds a peak acceleration reading is held before the scale may shrink.
    pub const ACC_SCALE_HOLD_SECONDS: f64 = 3.0;
    /// Headroom before a reading forces a larger scale.
    pub const ACC_SCALE_OVERSHOOT: f64 = 1.05;
    /// Samples in the slope rolling sums.
    pub const SLOPE_SAMPLES: usize = 30;
    /// Slope sampling interval (s).
    pub const SLOPE_REFRESH: f64 = 0.0167;
}

pub mod crash {
    /// Touchdown speed above which everyone aboard dies (m/s).
    pub const FATAL_SPEED: f64 = 39.0;
    /// Speed above which the crew is incapacitated (m/s).
    pub const SEVERE_INJURY_SPEED: f64 = 29.0;
    pub const MODERATE_INJURY_SPEED: f64 = 12.0;
}

pub mod notify {
    /// A warning identical to the one that just finished is held back this long (s).
    pub const WARNING_REPEAT_COOLDOWN: f64 = 3.0;
    /// Simulation time after which the startup status callout plays (s).
    pub const STARTUP_CALLOUT_SIMT: f64 = 1.0;
    /// Lines retained in the text line buffer.
    pub const MAX_TEXT_LINES: usize = 64;
}

pub mod airlock {
    /// Outer door proc above which the cabin vents.
    pub const DECOMPRESSION_PROC: f64 = 0.2;
}
