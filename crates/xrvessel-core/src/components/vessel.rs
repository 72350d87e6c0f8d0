//! Vessel-wide resources: one instance each per vessel.

use serde::{Deserialize, Serialize};
use xrvessel_logic::constants::{ctok, G};
use xrvessel_logic::damage::RCS_COUNT;
use xrvessel_logic::door::DoorStatus;
use xrvessel_logic::gauges::AccScale;

// ============================================================================
// HOST INPUTS
// ============================================================================

/// Flight state written by the host between the pre- and post-steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightState {
    pub ground_contact: bool,
    /// Altitude above ground (m).
    pub altitude: f64,
    /// Positive when climbing (m/s).
    pub vertical_speed: f64,
    pub dynamic_pressure: f64,
    pub static_pressure: f64,
    pub airspeed: f64,
    pub groundspeed: f64,
    pub mach: f64,
    /// Acceleration in vessel coordinates (m/s²).
    pub acc: [f64; 3],
    pub lift: f64,
    /// Lift per wing area (N/m²).
    pub wing_load: f64,
    pub slip: f64,
    pub aoa: f64,
    /// Outside air temperature (K).
    pub outside_air_temp: f64,
    pub docked: bool,
    pub has_focus: bool,
    pub parking_brake: bool,
    /// Combined wheel brake level, 0..2.
    pub wheel_brake: f64,
    /// Aerodynamic control surfaces enabled.
    pub af_ctrl_on: bool,
}

impl Default for FlightState {
    fn default() -> Self {
        Self {
            ground_contact: false,
            altitude: 0.0,
            vertical_speed: 0.0,
            dynamic_pressure: 0.0,
            static_pressure: 0.0,
            airspeed: 0.0,
            groundspeed: 0.0,
            mach: 0.0,
            acc: [0.0; 3],
            lift: 0.0,
            wing_load: 0.0,
            slip: 0.0,
            aoa: 0.0,
            outside_air_temp: 3.0,
            docked: false,
            has_focus: true,
            parking_brake: false,
            wheel_brake: 0.0,
            af_ctrl_on: false,
        }
    }
}

impl FlightState {
    /// Parked on a runway at sea level.
    pub fn landed() -> Self {
        Self {
            ground_contact: true,
            static_pressure: 101_325.0,
            outside_air_temp: ctok(15.0),
            acc: [0.0, G, 0.0],
            ..Default::default()
        }
    }

    /// Coasting in vacuum well above any surface.
    pub fn in_orbit(altitude: f64) -> Self {
        Self {
            altitude,
            ..Default::default()
        }
    }

    /// Above 50 kPa static pressure.
    pub fn in_atmosphere(&self) -> bool {
        self.static_pressure >= xrvessel_logic::constants::EARTH_ATM_PRESSURE_THRESHOLD
    }
}

// ============================================================================
// CREW
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrewState {
    #[default]
    Ok,
    Incapacitated,
    Dead,
}

impl CrewState {
    pub fn code(self) -> i32 {
        match self {
            CrewState::Ok => 0,
            CrewState::Incapacitated => 1,
            CrewState::Dead => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<CrewState> {
        match code {
            0 => Some(CrewState::Ok),
            1 => Some(CrewState::Incapacitated),
            2 => Some(CrewState::Dead),
            _ => None,
        }
    }
}

/// Crew aboard, as reported by the crew-management host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewStatus {
    pub state: CrewState,
    pub count: u32,
    pub pilot_aboard: bool,
}

impl Default for CrewStatus {
    fn default() -> Self {
        Self {
            state: CrewState::Ok,
            count: 1,
            pilot_aboard: true,
        }
    }
}

impl CrewStatus {
    pub fn incapacitated_or_no_pilot(&self) -> bool {
        self.state != CrewState::Ok || !self.pilot_aboard
    }

    /// Everyone aboard dies. Controls stay disabled even with nobody aboard.
    pub fn kill(&mut self) {
        self.state = CrewState::Dead;
        self.count = 0;
        self.pilot_aboard = false;
    }
}

// ============================================================================
// POWER
// ============================================================================

/// Auxiliary power unit. Its status uses the door state machine: `Opening`
/// is powering up, `Open` is online.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApuState {
    pub status: DoorStatus,
    pub fuel_qty_kg: f64,
    /// Fuel below the low-fuel fraction; blinks regardless of the MWS.
    pub warning: bool,
}

impl ApuState {
    pub fn full(capacity_kg: f64) -> Self {
        Self {
            status: DoorStatus::Closed,
            fuel_qty_kg: capacity_kg,
            warning: false,
        }
    }

    /// Running or spinning up.
    pub fn is_running(&self) -> bool {
        matches!(self.status, DoorStatus::Open | DoorStatus::Opening)
    }
}

/// Hydraulic pressure, the resource most doors draw on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydraulicResource {
    pub available: bool,
    /// Last time anything used hydraulic power; only moves forward.
    pub last_active_simt: f64,
}

impl HydraulicResource {
    pub fn mark_active(&mut self, simt: f64) {
        if simt > self.last_active_simt {
            self.last_active_simt = simt;
        }
    }
}

// ============================================================================
// AIRFRAME
// ============================================================================

/// Integrity of every damageable part that is not a door (1.0 = intact).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirframeIntegrity {
    pub left_wing: f64,
    pub right_wing: f64,
    pub left_aileron_failed: bool,
    pub right_aileron_failed: bool,
    /// Left, right.
    pub main_engines: [f64; 2],
    pub scram_engines: [f64; 2],
    /// Fore, aft.
    pub hover_engines: [f64; 2],
    pub retro_engines: [f64; 2],
    pub rcs: [f64; RCS_COUNT as usize],
    /// Roll imbalance after a crash; makes the wreck spiral.
    pub damaged_wing_balance: f64,
}

impl Default for AirframeIntegrity {
    fn default() -> Self {
        Self {
            left_wing: 1.0,
            right_wing: 1.0,
            left_aileron_failed: false,
            right_aileron_failed: false,
            main_engines: [1.0; 2],
            scram_engines: [1.0; 2],
            hover_engines: [1.0; 2],
            retro_engines: [1.0; 2],
            rcs: [1.0; RCS_COUNT as usize],
            damaged_wing_balance: 0.0,
        }
    }
}

// ============================================================================
// WARNINGS & CRASH
// ============================================================================

/// Master warning system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mws {
    pub active: bool,
    pub lit: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrashState {
    pub is_crashed: bool,
    pub message: String,
    /// Crash damage has been applied. Not persisted: a reloaded wreck is
    /// re-damaged once.
    #[serde(skip)]
    pub processed: bool,
}

/// Safety interlocks the pilot has overridden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterlockOverrides {
    pub crew_hatch: bool,
    pub airlock: bool,
}

// ============================================================================
// TRIM & GIMBALS
// ============================================================================

/// Centre of lift, hover balance and SCRAM gimbals plus their recentering modes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Centering {
    /// Offset from neutral (m).
    pub center_of_lift: f64,
    /// Automatic centre of gravity shift (attitude hold) engaged.
    pub cog_auto_mode: bool,
    pub cog_center_mode: bool,
    /// Recenter requested by an autopilot: only a silent hydraulics check.
    pub cog_force_recenter: bool,
    pub hover_balance: f64,
    pub hover_center_mode: bool,
    /// Pitch gimbal angle of each SCRAM engine (rad).
    pub scram_gimbal: [f64; 2],
    pub scram_center_mode: bool,
}

/// Elapsed-time stopwatch on the MDA.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervalTimer {
    pub running: bool,
    /// Elapsed time in days.
    pub elapsed_days: f64,
}

/// Settled gauge readings for the panels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gauges {
    pub acc_scale: AccScale,
    /// Flight path angle (rad).
    pub slope: f64,
}

/// Which engine groups their doors currently allow to fire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineGates {
    pub retro: bool,
    pub hover: bool,
    pub scram: bool,
}

/// Values captured by the last pre-step for comparison this tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviousFrame {
    pub simt: f64,
    pub ground_contact: bool,
    pub hydraulics_available: bool,
    pub apu_status: DoorStatus,
}
