//! Save/Load functionality for persisting vessel state
//!
//! Two formats:
//! - a bincode snapshot of the whole [`VesselState`], doors serialized
//!   individually and reattached to a fresh hecs world on load;
//! - the host's scenario text, one `KEY value...` line per field.

use std::io::{BufRead, Read, Write};

use serde::{Deserialize, Serialize};
use xrvessel_logic::config::{VesselSettings, VesselType};
use xrvessel_logic::constants::coolant::NOMINAL_TEMP;
use xrvessel_logic::damage::WarningLights;
use xrvessel_logic::door::{DoorId, DoorStatus};
use xrvessel_logic::scenario::{
    decode_text, encode_text, format_door_line, parse_bool, parse_door_line, parse_f64, split_line, validate,
    ParseIssue,
};
use xrvessel_logic::thermal::ThermalState;

use crate::components::*;
use crate::vessel::VesselState;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the vessel state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub vessel_type: VesselType,
    pub settings: VesselSettings,
    pub simt: f64,
    /// Every fitted door, in configuration order
    pub doors: Vec<Door>,
    pub flight: FlightState,
    pub crew: CrewStatus,
    pub apu: ApuState,
    pub hydraulics: HydraulicResource,
    pub external_cooling: DoorStatus,
    pub thermal: ThermalState,
    pub internal_systems_failure: bool,
    pub cabin_o2: f64,
    pub airframe: AirframeIntegrity,
    pub lights: WarningLights,
    pub mws: Mws,
    pub crash: CrashState,
    pub interlocks: InterlockOverrides,
    pub centering: Centering,
    pub timers: [IntervalTimer; 2],
    pub gauges: Gauges,
    pub engines: EngineGates,
}

impl SaveData {
    pub fn capture(state: &VesselState) -> Self {
        Self {
            version: SAVE_VERSION,
            vessel_type: state.config.vessel_type,
            settings: state.config.settings.clone(),
            simt: state.simt,
            doors: state.doors(),
            flight: state.flight.clone(),
            crew: state.crew.clone(),
            apu: state.apu.clone(),
            hydraulics: state.hydraulics.clone(),
            external_cooling: state.external_cooling,
            thermal: state.thermal,
            internal_systems_failure: state.internal_systems_failure,
            cabin_o2: state.cabin_o2,
            airframe: state.airframe.clone(),
            lights: state.lights.clone(),
            mws: state.mws.clone(),
            crash: state.crash.clone(),
            interlocks: state.interlocks.clone(),
            centering: state.centering.clone(),
            timers: state.timers.clone(),
            gauges: state.gauges.clone(),
            engines: state.engines.clone(),
        }
    }

    /// Overwrite `state` with this snapshot. The vessel types must match.
    pub fn restore(self, state: &mut VesselState) -> Result<(), SaveError> {
        if self.vessel_type != state.config.vessel_type {
            return Err(SaveError::VesselTypeMismatch {
                expected: state.config.vessel_type,
                found: self.vessel_type,
            });
        }
        state.config.settings = self.settings;
        state.simt = self.simt;
        state.replace_doors(self.doors);
        state.flight = self.flight;
        state.crew = self.crew;
        state.apu = self.apu;
        state.hydraulics = self.hydraulics;
        state.external_cooling = self.external_cooling;
        state.thermal = self.thermal;
        state.internal_systems_failure = self.internal_systems_failure;
        state.cabin_o2 = self.cabin_o2;
        state.airframe = self.airframe;
        state.lights = self.lights;
        state.mws = self.mws;
        state.crash = self.crash;
        state.interlocks = self.interlocks;
        state.centering = self.centering;
        state.timers = self.timers;
        state.gauges = self.gauges;
        state.engines = self.engines;
        Ok(())
    }
}

/// Save the complete vessel to a writer
pub fn save_vessel<W: Write>(writer: W, state: &VesselState) -> Result<(), SaveError> {
    bincode::serialize_into(writer, &SaveData::capture(state))?;
    log::info!("saved {} snapshot at simt {:.2}", state.config.vessel_type.name(), state.simt);
    Ok(())
}

/// Read a snapshot from a reader
pub fn load_vessel<R: Read>(reader: R) -> Result<SaveData, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }
    Ok(save_data)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    VesselTypeMismatch { expected: VesselType, found: VesselType },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::VesselTypeMismatch { expected, found } => {
                write!(
                    f,
                    "Saved vessel is an {}, not an {}",
                    found.name(),
                    expected.name()
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

// ============================================================================
// SCENARIO LINES
// ============================================================================

const DAMAGE_KEY_PREFIX: &str = "DMG_";

fn flag(b: bool) -> u8 {
    u8::from(b)
}

/// Write the vessel's scenario lines.
pub fn write_scenario<W: Write>(writer: &mut W, state: &VesselState) -> std::io::Result<()> {
    for door in state.doors() {
        writeln!(writer, "{}", format_door_line(door.id, door.status, door.proc))?;
    }
    writeln!(writer, "APU_STATUS {}", state.apu.status.token())?;
    writeln!(writer, "APU_FUEL_QTY {:.6}", state.apu_fuel_frac())?;
    writeln!(writer, "EXTCOOLING_STATUS {}", state.external_cooling.token())?;
    writeln!(writer, "CABIN_O2_LEVEL {:.6}", state.cabin_o2)?;

    let t = &state.thermal;
    writeln!(writer, "COOLANT_TEMP {:.6}", t.coolant_temp)?;
    writeln!(writer, "NOSECONE_TEMP {:.6}", t.nosecone_temp)?;
    writeln!(writer, "LWING_TEMP {:.6}", t.left_wing_temp)?;
    writeln!(writer, "RWING_TEMP {:.6}", t.right_wing_temp)?;
    writeln!(writer, "COCKPIT_TEMP {:.6}", t.cockpit_temp)?;
    writeln!(writer, "TOPHULL_TEMP {:.6}", t.top_hull_temp)?;

    writeln!(writer, "CREW_STATE {}", state.crew.state.code())?;
    writeln!(writer, "INTERNAL_SYSTEMS_FAILURE {}", flag(state.internal_systems_failure))?;
    writeln!(writer, "MWS_ACTIVE {}", flag(state.mws.active))?;

    for (i, item) in state.damage_items().into_iter().enumerate() {
        let label = state
            .damage_status(item)
            .map(|s| s.label)
            .unwrap_or_default();
        writeln!(writer, "{}{} {:.6} {}", DAMAGE_KEY_PREFIX, i, state.integrity(item), label)?;
    }

    writeln!(writer, "IS_CRASHED {}", flag(state.crash.is_crashed))?;
    if !state.crash.message.is_empty() {
        writeln!(writer, "CRASH_MSG {}", encode_text(&state.crash.message))?;
    }

    for (i, timer) in state.timers.iter().enumerate() {
        writeln!(writer, "INTERVAL{}_ELAPSED_TIME {:.6}", i + 1, timer.elapsed_days)?;
        writeln!(writer, "INTERVAL{}_RUNNING {}", i + 1, flag(timer.running))?;
    }

    let c = &state.centering;
    writeln!(
        writer,
        "COGSHIFT_MODES {} {} {}",
        flag(c.cog_auto_mode),
        flag(c.cog_center_mode),
        flag(c.cog_force_recenter)
    )?;
    writeln!(
        writer,
        "GIMBAL_BUTTON_STATES {} {}",
        flag(c.hover_center_mode),
        flag(c.scram_center_mode)
    )?;
    writeln!(writer, "CENTER_OF_LIFT {:.6}", c.center_of_lift)?;
    writeln!(writer, "HOVER_BALANCE {:.6}", c.hover_balance)?;
    writeln!(writer, "SCRAM0_GIMBAL {:.6}", c.scram_gimbal[0])?;
    writeln!(writer, "SCRAM1_GIMBAL {:.6}", c.scram_gimbal[1])?;

    writeln!(
        writer,
        "OVERRIDE_INTERLOCKS {} {}",
        flag(state.interlocks.crew_hatch),
        flag(state.interlocks.airlock)
    )?;
    writeln!(writer, "PARKING_BRAKES {}", flag(state.flight.parking_brake))?;
    Ok(())
}

/// Parse `n` whitespace-separated flags.
fn parse_flags(key: &str, value: &str, n: usize) -> Result<Vec<bool>, ParseIssue> {
    let flags = value
        .split_whitespace()
        .take(n)
        .map(|v| parse_bool(key, v))
        .collect::<Result<Vec<_>, _>>()?;
    if flags.len() < n {
        return Err(ParseIssue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "too few values",
        });
    }
    Ok(flags)
}

/// Apply one scenario line. Damage lines are collected for later replay.
fn apply_line(state: &mut VesselState, key: &str, value: &str, damage: &mut Vec<(usize, f64)>) -> Result<(), ParseIssue> {
    if let Some(id) = DoorId::from_scenario_key(key) {
        let (status, proc) = parse_door_line(key, value)?;
        if state.with_door(id, |d| *d = Door::new(id).with_state(status, proc)).is_none() {
            log::debug!("ignoring {}: door not fitted", key);
        }
        return Ok(());
    }
    if let Some(index) = key.strip_prefix(DAMAGE_KEY_PREFIX) {
        if let Ok(index) = index.parse::<usize>() {
            damage.push((index, validate(parse_f64(key, value)?, 0.0, 1.0)));
            return Ok(());
        }
    }

    let max_coolant = state.config.max_coolant_temp;
    let capacity = state.config.apu_fuel_capacity_kg;
    match key {
        "APU_STATUS" => {
            let (status, _) = parse_door_line(key, value)?;
            state.apu.status = status;
        }
        "APU_FUEL_QTY" => state.apu.fuel_qty_kg = validate(parse_f64(key, value)?, 0.0, 1.0) * capacity,
        "EXTCOOLING_STATUS" => {
            let (status, _) = parse_door_line(key, value)?;
            state.external_cooling = status;
        }
        "CABIN_O2_LEVEL" => state.cabin_o2 = validate(parse_f64(key, value)?, 0.0, 1.0),
        "COOLANT_TEMP" => state.thermal.coolant_temp = validate(parse_f64(key, value)?, NOMINAL_TEMP, max_coolant),
        "NOSECONE_TEMP" => state.thermal.nosecone_temp = validate(parse_f64(key, value)?, 0.0, 1e5),
        "LWING_TEMP" => state.thermal.left_wing_temp = validate(parse_f64(key, value)?, 0.0, 1e5),
        "RWING_TEMP" => state.thermal.right_wing_temp = validate(parse_f64(key, value)?, 0.0, 1e5),
        "COCKPIT_TEMP" => state.thermal.cockpit_temp = validate(parse_f64(key, value)?, 0.0, 1e5),
        "TOPHULL_TEMP" => state.thermal.top_hull_temp = validate(parse_f64(key, value)?, 0.0, 1e5),
        "CREW_STATE" => {
            let code = parse_f64(key, value)? as i32;
            state.crew.state = CrewState::from_code(code).ok_or(ParseIssue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "unknown crew state",
            })?;
        }
        "INTERNAL_SYSTEMS_FAILURE" => state.internal_systems_failure = parse_bool(key, value)?,
        "MWS_ACTIVE" => state.mws.active = parse_bool(key, value)?,
        "IS_CRASHED" => state.crash.is_crashed = parse_bool(key, value)?,
        "CRASH_MSG" => state.crash.message = decode_text(value),
        "INTERVAL1_ELAPSED_TIME" => state.timers[0].elapsed_days = validate(parse_f64(key, value)?, 0.0, f64::MAX),
        "INTERVAL2_ELAPSED_TIME" => state.timers[1].elapsed_days = validate(parse_f64(key, value)?, 0.0, f64::MAX),
        "INTERVAL1_RUNNING" => state.timers[0].running = parse_bool(key, value)?,
        "INTERVAL2_RUNNING" => state.timers[1].running = parse_bool(key, value)?,
        "COGSHIFT_MODES" => {
            let f = parse_flags(key, value, 3)?;
            state.centering.cog_auto_mode = f[0];
            state.centering.cog_center_mode = f[1];
            state.centering.cog_force_recenter = f[2];
        }
        "GIMBAL_BUTTON_STATES" => {
            let f = parse_flags(key, value, 2)?;
            state.centering.hover_center_mode = f[0];
            state.centering.scram_center_mode = f[1];
        }
        "CENTER_OF_LIFT" => {
            use xrvessel_logic::constants::centering::COL_MAX_SHIFT;
            state.centering.center_of_lift = validate(parse_f64(key, value)?, -COL_MAX_SHIFT, COL_MAX_SHIFT);
        }
        "HOVER_BALANCE" => {
            use xrvessel_logic::constants::centering::MAX_HOVER_BALANCE;
            state.centering.hover_balance = validate(parse_f64(key, value)?, -MAX_HOVER_BALANCE, MAX_HOVER_BALANCE);
        }
        "SCRAM0_GIMBAL" | "SCRAM1_GIMBAL" => {
            use xrvessel_logic::constants::centering::SCRAM_GIMBAL_LIMIT;
            let i = usize::from(key == "SCRAM1_GIMBAL");
            state.centering.scram_gimbal[i] = validate(parse_f64(key, value)?, -SCRAM_GIMBAL_LIMIT, SCRAM_GIMBAL_LIMIT);
        }
        "OVERRIDE_INTERLOCKS" => {
            let f = parse_flags(key, value, 2)?;
            state.interlocks.crew_hatch = f[0];
            state.interlocks.airlock = f[1];
        }
        "PARKING_BRAKES" => state.flight.parking_brake = parse_bool(key, value)?,
        _ => log::debug!("ignoring unknown scenario key {}", key),
    }
    Ok(())
}

/// Read scenario lines into `state`. Unknown keys are ignored, missing keys
/// keep their current values and malformed lines are logged and skipped.
/// Returns the number of lines that could not be parsed.
pub fn read_scenario<R: BufRead>(reader: &mut R, state: &mut VesselState) -> std::io::Result<usize> {
    let mut damage = Vec::new();
    let mut skipped = 0;
    for line in reader.lines() {
        let line = line?;
        let Some((key, value)) = split_line(&line) else {
            continue;
        };
        if let Err(issue) = apply_line(state, key, value, &mut damage) {
            log::warn!("skipping scenario line: {}", issue);
            skipped += 1;
        }
    }

    // replayed last so door lines cannot undo a failure
    let items = state.damage_items();
    for (index, frac) in damage {
        match items.get(index) {
            Some(item) => {
                if let Err(e) = state.set_damage_status(*item, frac) {
                    log::warn!("skipping {}{}: {}", DAMAGE_KEY_PREFIX, index, e);
                }
            }
            None => log::warn!("skipping {}{}: no such damage item", DAMAGE_KEY_PREFIX, index),
        }
    }
    if state.crew.state == CrewState::Dead {
        state.crew.kill();
    }
    log::info!("loaded {} scenario ({} lines skipped)", state.config.vessel_type.name(), skipped);
    Ok(skipped)
}
