//! Thermal models: coolant loop and airframe (hull) heating.
//!
//! All functions are pure; the per-tick post-steps in `xrvessel-core` own
//! the state and the random draws.

use serde::{Deserialize, Serialize};

use crate::constants::{coolant, hull};

/// Temperatures tracked by the vessel.
///
/// Coolant is in °C, hull surfaces in K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalState {
    pub coolant_temp: f64,
    pub nosecone_temp: f64,
    pub left_wing_temp: f64,
    pub right_wing_temp: f64,
    pub cockpit_temp: f64,
    pub top_hull_temp: f64,
}

impl Default for ThermalState {
    fn default() -> Self {
        let ambient = crate::constants::ctok(15.0);
        Self {
            coolant_temp: coolant::NOMINAL_TEMP,
            nosecone_temp: ambient,
            left_wing_temp: ambient,
            right_wing_temp: ambient,
            cockpit_temp: ambient,
            top_hull_temp: ambient,
        }
    }
}

/// Hull surfaces with independent temperatures and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullSurface {
    Nosecone,
    /// Belly; shares the nosecone temperature.
    LowerHull,
    LeftWing,
    RightWing,
    /// Both wings; the hotter one counts.
    Wings,
    Cockpit,
    TopHull,
}

impl HullSurface {
    /// Current temperature of this surface in K.
    pub fn temperature(self, state: &ThermalState) -> f64 {
        match self {
            HullSurface::Nosecone | HullSurface::LowerHull => state.nosecone_temp,
            HullSurface::LeftWing => state.left_wing_temp,
            HullSurface::RightWing => state.right_wing_temp,
            HullSurface::Wings => state.left_wing_temp.max(state.right_wing_temp),
            HullSurface::Cockpit => state.cockpit_temp,
            HullSurface::TopHull => state.top_hull_temp,
        }
    }
}

// ============================================================================
// COOLANT
// ============================================================================

/// Coolant temperature after one tick of heating.
///
/// `heating_rate` is in °C/s; a running APU adds 5%. Never exceeds `max_temp`.
pub fn coolant_heat(temp: f64, heating_rate: f64, simdt: f64, apu_running: bool, max_temp: f64) -> f64 {
    let modifier = if apu_running {
        1.0 + coolant::APU_HEATING_MODIFIER
    } else {
        1.0
    };
    (temp + heating_rate * simdt * modifier).min(max_temp)
}

/// Heat shed by the radiator (or external cooling) in one tick.
pub fn coolant_cooling(temp: f64, simdt: f64, external: bool) -> f64 {
    let frac = if external {
        coolant::RADIATOR_COOLING_FRAC * coolant::EXTERNAL_COOLING_MULTIPLIER
    } else {
        coolant::RADIATOR_COOLING_FRAC
    };
    (temp * frac).max(coolant::RADIATOR_MIN_COOLING) * simdt
}

/// Probability a component fails this tick when running hot.
///
/// `(simdt / mttf) * (temp / critical)^2`: small overages rarely fail,
/// large overages fail quickly.
pub fn failure_probability(simdt: f64, mean_time_to_failure: f64, temp: f64, critical: f64) -> f64 {
    if mean_time_to_failure <= 0.0 || critical <= 0.0 {
        return 1.0;
    }
    let ratio = temp / critical;
    (simdt / mean_time_to_failure) * ratio * ratio
}

// ============================================================================
// HULL HEATING
// ============================================================================

/// Fraction of aerodynamic heat that reaches the hull after conduction into
/// the surrounding air. 1.0 in thin air, falling to
/// [`hull::MIN_CONDUCTION_FRAC`] at low altitude.
pub fn conduction_fraction(static_pressure: f64) -> f64 {
    if static_pressure <= hull::MIN_CONDUCTION_PRESSURE {
        return 1.0;
    }
    let power = ((static_pressure - hull::MIN_CONDUCTION_PRESSURE)
        / (hull::MAX_CONDUCTION_PRESSURE - hull::MIN_CONDUCTION_PRESSURE))
        .min(1.0);
    1.0 - (1.0 - hull::MIN_CONDUCTION_FRAC) * power
}

/// Temperature the hull settles to (K).
///
/// The reported outside air temperature is only trusted once static
/// pressure reaches [`hull::OAT_VALID_STATIC_PRESSURE`]; below that it
/// tapers to 10%.
pub fn external_temperature(outside_air_temp: f64, static_pressure: f64) -> f64 {
    outside_air_temp * (static_pressure / hull::OAT_VALID_STATIC_PRESSURE).clamp(0.1, 1.0)
}

/// Inputs to the hull heating model for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeroHeatInput {
    pub airspeed: f64,
    pub static_pressure: f64,
    pub slip: f64,
    pub aoa: f64,
    pub external_temp: f64,
}

/// Stagnation heating in K above ambient at the leading edge.
pub fn leading_edge_heat(input: &AeroHeatInput, heating_factor: f64) -> f64 {
    let v = input.airspeed;
    let pressure_term = input.static_pressure / 2.0;
    v * v * v * pressure_term * heating_factor * hull::HEATING_TUNING * conduction_fraction(input.static_pressure)
}

/// Raise each surface toward its heated temperature. Surfaces are never
/// lowered here; cooling happens in [`remove_hull_heat`].
pub fn add_hull_heat(state: &mut ThermalState, input: &AeroHeatInput, degrees: f64) {
    let slip = input.slip;
    let aoa = input.aoa;

    let (slip_frac, aoa_frac) = if slip.abs().to_degrees() <= 90.0 {
        (1.0 - slip.abs().sin() / 5.0 / 2.0, 1.0 - aoa.abs().sin() / 3.0 / 2.0)
    } else {
        (slip.abs().sin() / 5.0 / 2.0, aoa.abs().sin() / 3.0 / 2.0)
    };
    let nose_frac = slip_frac * aoa_frac;
    let right_wing_frac = (1.0 - slip.sin() * 0.9).min(1.0);
    let left_wing_frac = (1.0 - (-slip).sin() * 0.9).min(1.0);
    let cockpit_frac = (1.0 - aoa.sin()).min(1.2);

    let ext = input.external_temp;
    raise(&mut state.nosecone_temp, ext + nose_frac * degrees);
    raise(&mut state.left_wing_temp, ext + left_wing_frac * degrees * 0.75);
    raise(&mut state.right_wing_temp, ext + right_wing_frac * degrees * 0.75);
    let cockpit_delta = cockpit_frac * degrees * 0.73;
    raise(&mut state.cockpit_temp, ext + cockpit_delta);
    raise(&mut state.top_hull_temp, ext + cockpit_delta * 0.80);
}

fn raise(temp: &mut f64, candidate: f64) {
    if candidate > *temp {
        *temp = candidate;
    }
}

/// Shed heat from every surface toward `external_temp`.
pub fn remove_hull_heat(state: &mut ThermalState, external_temp: f64, simdt: f64) {
    for temp in [
        &mut state.nosecone_temp,
        &mut state.left_wing_temp,
        &mut state.right_wing_temp,
        &mut state.cockpit_temp,
        &mut state.top_hull_temp,
    ] {
        *temp = cool_surface(*temp, external_temp, simdt);
    }
}

/// One surface: drop 2% of the excess or 0.1 K per second, whichever is
/// larger, never undershooting ambient.
pub fn cool_surface(temp: f64, external_temp: f64, simdt: f64) -> f64 {
    let delta = (temp - external_temp).abs();
    let dropped = (delta * hull::HEAT_DROP_FRAC).max(hull::MIN_HEAT_DROP) * simdt;
    (temp - dropped).max(external_temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolant_heat_clamps() {
        let t = coolant_heat(100.0, 1.0, 10.0, false, 108.0);
        assert_eq!(t, 108.0);
        let t = coolant_heat(50.0, 0.01, 1.0, true, 108.0);
        assert!((t - 50.0105).abs() < 1e-12);
    }

    #[test]
    fn test_coolant_cooling_minimum() {
        // below about 30.15 C the floor takes over
        assert!((coolant_cooling(20.0, 1.0, false) - 0.015).abs() < 1e-12);
        let nominal = coolant_cooling(31.2, 1.0, false);
        assert!((nominal - 31.2 * coolant::RADIATOR_COOLING_FRAC).abs() < 1e-12);
        assert!(nominal > 0.015);
        let ext = coolant_cooling(100.0, 1.0, true);
        let rad = coolant_cooling(100.0, 1.0, false);
        assert!(ext >= rad);
    }

    #[test]
    fn test_failure_probability_scales_quadratically() {
        let p1 = failure_probability(1.0, 20.0, 90.0, 90.0);
        let p2 = failure_probability(1.0, 20.0, 180.0, 90.0);
        assert!((p1 - 0.05).abs() < 1e-12);
        assert!((p2 - 4.0 * p1).abs() < 1e-12);
    }

    #[test]
    fn test_conduction_fraction_bounds() {
        assert_eq!(conduction_fraction(0.0), 1.0);
        assert_eq!(conduction_fraction(7000.0), 1.0);
        assert!((conduction_fraction(97700.0) - hull::MIN_CONDUCTION_FRAC).abs() < 1e-9);
        assert!((conduction_fraction(200000.0) - hull::MIN_CONDUCTION_FRAC).abs() < 1e-9);
    }

    #[test]
    fn test_add_heat_never_cools() {
        let mut state = ThermalState::default();
        state.cockpit_temp = 2000.0;
        let input = AeroHeatInput {
            external_temp: 250.0,
            ..Default::default()
        };
        add_hull_heat(&mut state, &input, 10.0);
        assert_eq!(state.cockpit_temp, 2000.0);
        assert!(state.nosecone_temp >= 250.0);
    }

    #[test]
    fn test_cool_surface_floors_at_ambient() {
        assert_eq!(cool_surface(250.05, 250.0, 1.0), 250.0);
        let t = cool_surface(1250.0, 250.0, 1.0);
        assert!((t - 1230.0).abs() < 1e-9);
    }

    #[test]
    fn test_wings_surface_takes_hotter() {
        let state = ThermalState {
            left_wing_temp: 500.0,
            right_wing_temp: 700.0,
            ..Default::default()
        };
        assert_eq!(HullSurface::Wings.temperature(&state), 700.0);
        assert_eq!(HullSurface::LowerHull.temperature(&state), state.nosecone_temp);
    }
}
