//! Hull and coolant temperature integration.

use xrvessel_logic::constants::coolant::{CRITICAL_TEMP, MEAN_TIME_TO_FAILURE, NOMINAL_TEMP, WARNING_TEMP};
use xrvessel_logic::constants::hull::OAT_VALID_STATIC_PRESSURE;
use xrvessel_logic::damage::WarningLight;
use xrvessel_logic::door::{DoorId, DoorStatus};
use xrvessel_logic::thermal::{
    add_hull_heat, coolant_cooling, coolant_heat, external_temperature, failure_probability,
    leading_edge_heat, remove_hull_heat, AeroHeatInput,
};

use super::{PrePostStep, StepContext};
use crate::sound::{files, SoundType};
use crate::vessel::VesselState;

/// Heats the hull from airflow and lets it cool toward ambient.
pub struct SetHullTempsPostStep {
    force_update: bool,
}

impl SetHullTempsPostStep {
    pub fn new() -> Self {
        Self { force_update: true }
    }
}

impl Default for SetHullTempsPostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for SetHullTempsPostStep {
    fn name(&self) -> &'static str {
        "SetHullTemps"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        let flight = &state.flight;
        let external_temp = external_temperature(flight.outside_air_temp, flight.static_pressure);

        if self.force_update || flight.static_pressure >= OAT_VALID_STATIC_PRESSURE {
            let input = AeroHeatInput {
                airspeed: flight.airspeed,
                static_pressure: flight.static_pressure,
                slip: flight.slip,
                aoa: flight.aoa,
                external_temp,
            };
            let degrees = leading_edge_heat(&input, state.config.hull_heating_factor);
            if self.force_update || degrees > 0.0 {
                add_hull_heat(&mut state.thermal, &input, degrees);
            }
        }
        self.force_update = false;

        remove_hull_heat(&mut state.thermal, external_temp, ctx.simdt);
    }
}

/// Coolant loop: heats continuously, sheds heat through the radiator and
/// the ground cart, and takes the environmental systems down when critical.
pub struct UpdateCoolantTempPostStep {
    prev_temp: f64,
}

impl UpdateCoolantTempPostStep {
    pub fn new() -> Self {
        Self { prev_temp: NOMINAL_TEMP }
    }
}

impl Default for UpdateCoolantTempPostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for UpdateCoolantTempPostStep {
    fn name(&self) -> &'static str {
        "UpdateCoolantTemp"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        if state.is_crashed() {
            return;
        }
        let simdt = ctx.simdt;
        let mut temp = coolant_heat(
            state.thermal.coolant_temp,
            state.config.settings.coolant_heating_rate(),
            simdt,
            state.apu.is_running(),
            state.config.max_coolant_temp,
        );
        if state.door_status(DoorId::Radiator) == DoorStatus::Open {
            temp -= coolant_cooling(temp, simdt, false);
        }
        if state.external_cooling == DoorStatus::Open {
            temp -= coolant_cooling(temp, simdt, true);
        }
        temp = temp.max(NOMINAL_TEMP);

        if temp >= CRITICAL_TEMP {
            if state.internal_systems_failure {
                state.mws.active = true;
                state.lights.set(WarningLight::Coolant, true);
            } else {
                state.show_warning(
                    Some(files::COOLANT_CRITICAL),
                    SoundType::WarningCallout,
                    "WARNING: coolant temperature critical!",
                    false,
                );
                let p = failure_probability(simdt, MEAN_TIME_TO_FAILURE, temp, CRITICAL_TEMP);
                if state.rand() <= p {
                    log::warn!("internal systems failed at coolant {:.1} C", temp);
                    state.internal_systems_failure = true;
                    state.mws.active = true;
                    state.show_warning(
                        Some(files::SYSTEMS_FAILURE),
                        SoundType::WarningCallout,
                        "WARNING: SYSTEMS FAILURE!&Environmental systems offline;&DEPLOY THE RADIATOR!",
                        true,
                    );
                }
                state.lights.set(WarningLight::Coolant, true);
                if self.prev_temp < CRITICAL_TEMP {
                    state.mws.active = true;
                }
            }
        } else if temp >= WARNING_TEMP {
            state.lights.set(WarningLight::Coolant, true);
            if self.prev_temp < WARNING_TEMP {
                state.show_warning(
                    Some(files::COOLANT_WARNING),
                    SoundType::WarningCallout,
                    "WARNING: deploy radiator!&Check coolant temperature.",
                    false,
                );
                state.mws.active = true;
            }
            if self.prev_temp >= CRITICAL_TEMP {
                state.show_info(
                    Some(files::SYSTEMS_REBOOTED),
                    SoundType::InformationCallout,
                    "Systems rebooted;&Environmental systems online.",
                );
            }
        } else {
            state.lights.set(WarningLight::Coolant, false);
        }

        if temp < CRITICAL_TEMP {
            state.internal_systems_failure = false;
        }
        state.thermal.coolant_temp = temp;
        self.prev_temp = temp;
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
    use xrvessel_logic::constants::coolant::HEATING_RATES;

    fn setup() -> (VesselState, SubsystemTable) {
        let config = crate::config::builtin_config(VesselType::Xr1).expect("builtin config");
        let table = SubsystemTable::for_config(&config);
        let mut s = VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(13));
        for id in s.fitted_doors() {
            s.with_door(id, |d| d.jump(DoorStatus::Closed));
        }
        (s, table)
    }

    fn ctx(table: &SubsystemTable, simdt: f64) -> StepContext<'_> {
        StepContext {
            simt: 10.0,
            simdt,
            mjd: 0.0,
            subsystems: table,
        }
    }

    #[test]
    fn test_coolant_rises_by_rate() {
        let (mut s, table) = setup();
        let mut step = UpdateCoolantTempPostStep::new();
        step.step(&ctx(&table, 1.0), &mut s);
        let expected = NOMINAL_TEMP + HEATING_RATES[1];
        assert!((s.thermal.coolant_temp - expected).abs() < 1e-12);
    }

    #[test]
    fn test_radiator_holds_nominal() {
        let (mut s, table) = setup();
        s.with_door(DoorId::Radiator, |d| d.jump(DoorStatus::Open));
        let mut step = UpdateCoolantTempPostStep::new();
        for _ in 0..100 {
            step.step(&ctx(&table, 1.0), &mut s);
        }
        assert_eq!(s.thermal.coolant_temp, NOMINAL_TEMP);
    }

    #[test]
    fn test_warning_band_lights_and_warns_once() {
        let (mut s, table) = setup();
        s.thermal.coolant_temp = WARNING_TEMP - 0.001;
        let mut step = UpdateCoolantTempPostStep::new();
        step.step(&ctx(&table, 1.0), &mut s);
        step.step(&ctx(&table, 1.0), &mut s);
        assert!(s.lights.is_lit(WarningLight::Coolant));
        assert!(s.mws.active);
        assert_eq!(s.notifier.text.count("WARNING: deploy radiator!"), 1);
    }

    #[test]
    fn test_critical_eventually_fails_systems() {
        let (mut s, table) = setup();
        s.thermal.coolant_temp = 100.0;
        let mut step = UpdateCoolantTempPostStep::new();
        for _ in 0..2000 {
            step.step(&ctx(&table, 1.0), &mut s);
            if s.internal_systems_failure {
                break;
            }
        }
        assert!(s.internal_systems_failure);
    }

    #[test]
    fn test_hull_cools_toward_ambient_in_vacuum() {
        let (mut s, table) = setup();
        s.flight = FlightState::in_orbit(300e3);
        s.thermal.nosecone_temp = 1500.0;
        let mut step = SetHullTempsPostStep::new();
        step.step(&ctx(&table, 1.0), &mut s);
        assert!(s.thermal.nosecone_temp < 1500.0);
    }

    #[test]
    fn test_hull_heats_at_speed() {
        let (mut s, table) = setup();
        s.flight = FlightState {
            static_pressure: 2000.0,
            airspeed: 6000.0,
            outside_air_temp: 230.0,
            ..FlightState::in_orbit(60e3)
        };
        let before = s.thermal.nosecone_temp;
        let mut step = SetHullTempsPostStep::new();
        step.step(&ctx(&table, 0.1), &mut s);
        assert!(s.thermal.nosecone_temp > before);
        assert!(s.thermal.nosecone_temp > s.thermal.top_hull_temp);
    }
}
