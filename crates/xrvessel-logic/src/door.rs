//! Door/system state machine primitives.
//!
//! Every animated subsystem on the vessel (gear, airlocks, radiator, bay
//! doors, the APU) is described by a coarse [`DoorStatus`] and, for doors
//! with a physical position, a continuous `proc` in `[0, 1]` where 0 is
//! fully closed and 1 is fully open. The coarse status is derived from the
//! proc and the direction of travel; `Failed` overrides everything until a
//! repair clears it.

use serde::{Deserialize, Serialize};

/// Proc values this close to an extreme snap onto it.
const PROC_EPSILON: f64 = 1e-9;

/// Identifies a door or animated subsystem fitted to a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DoorId {
    LandingGear,
    Nosecone,
    OuterAirlock,
    InnerAirlock,
    AirlockChamber,
    Hatch,
    Ladder,
    Radiator,
    Airbrake,
    RetroDoors,
    HoverDoors,
    ScramDoors,
    BayDoors,
    Elevator,
}

impl DoorId {
    pub fn all() -> &'static [DoorId] {
        &[
            DoorId::LandingGear,
            DoorId::Nosecone,
            DoorId::OuterAirlock,
            DoorId::InnerAirlock,
            DoorId::AirlockChamber,
            DoorId::Hatch,
            DoorId::Ladder,
            DoorId::Radiator,
            DoorId::Airbrake,
            DoorId::RetroDoors,
            DoorId::HoverDoors,
            DoorId::ScramDoors,
            DoorId::BayDoors,
            DoorId::Elevator,
        ]
    }

    /// Key used for this door in scenario files.
    pub fn scenario_key(self) -> &'static str {
        match self {
            DoorId::LandingGear => "GEAR",
            DoorId::Nosecone => "NOSECONE",
            DoorId::OuterAirlock => "AIRLOCK",
            DoorId::InnerAirlock => "IAIRLOCK",
            DoorId::AirlockChamber => "CHAMBER",
            DoorId::Hatch => "HATCH",
            DoorId::Ladder => "LADDER",
            DoorId::Radiator => "RADIATOR",
            DoorId::Airbrake => "AIRBRAKE",
            DoorId::RetroDoors => "RCOVER",
            DoorId::HoverDoors => "HOVER_DOORS",
            DoorId::ScramDoors => "SCRAM_DOORS",
            DoorId::BayDoors => "BAY_DOORS",
            DoorId::Elevator => "ELEVATOR",
        }
    }

    pub fn from_scenario_key(key: &str) -> Option<DoorId> {
        DoorId::all().iter().copied().find(|d| d.scenario_key() == key)
    }
}

/// Coarse status of a door or subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DoorStatus {
    #[default]
    NotSet,
    Closed,
    Closing,
    Opening,
    Open,
    Failed,
}

impl DoorStatus {
    pub fn all() -> &'static [DoorStatus] {
        &[
            DoorStatus::NotSet,
            DoorStatus::Closed,
            DoorStatus::Closing,
            DoorStatus::Opening,
            DoorStatus::Open,
            DoorStatus::Failed,
        ]
    }

    /// Token written to scenario files.
    pub fn token(self) -> &'static str {
        match self {
            DoorStatus::NotSet => "NOT_SET",
            DoorStatus::Closed => "CLOSED",
            DoorStatus::Closing => "CLOSING",
            DoorStatus::Opening => "OPENING",
            DoorStatus::Open => "OPEN",
            DoorStatus::Failed => "FAILED",
        }
    }

    /// Numeric code used by older scenario files.
    pub fn legacy_code(self) -> i32 {
        match self {
            DoorStatus::NotSet => -2,
            DoorStatus::Failed => -1,
            DoorStatus::Closed => 0,
            DoorStatus::Open => 1,
            DoorStatus::Closing => 2,
            DoorStatus::Opening => 3,
        }
    }

    /// Parse a scenario token. Legacy numeric codes are accepted too.
    pub fn from_token(token: &str) -> Option<DoorStatus> {
        let token = token.trim();
        if let Some(status) = DoorStatus::all()
            .iter()
            .copied()
            .find(|s| s.token().eq_ignore_ascii_case(token))
        {
            return Some(status);
        }
        let code: i32 = token.parse().ok()?;
        DoorStatus::all()
            .iter()
            .copied()
            .find(|s| s.legacy_code() == code)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DoorStatus::Open | DoorStatus::Closed)
    }

    pub fn is_moving(self) -> bool {
        matches!(self, DoorStatus::Opening | DoorStatus::Closing)
    }

    /// Direction implied by this status, if any.
    ///
    /// `Open`/`Opening` point toward open, `Closed`/`Closing` toward closed.
    pub fn direction(self) -> Option<Direction> {
        match self {
            DoorStatus::Open | DoorStatus::Opening => Some(Direction::Opening),
            DoorStatus::Closed | DoorStatus::Closing => Some(Direction::Closing),
            DoorStatus::NotSet | DoorStatus::Failed => None,
        }
    }

    /// Open for the purposes of dynamic pressure and heat checks: anything
    /// that is neither sealed nor already failed.
    pub fn is_exposed(self) -> bool {
        !matches!(self, DoorStatus::Closed | DoorStatus::Failed)
    }
}

/// Direction of travel of a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Opening,
    Closing,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Opening => 1.0,
            Direction::Closing => -1.0,
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Opening => Direction::Closing,
            Direction::Closing => Direction::Opening,
        }
    }

    /// Status while travelling in this direction.
    pub fn moving_status(self) -> DoorStatus {
        match self {
            Direction::Opening => DoorStatus::Opening,
            Direction::Closing => DoorStatus::Closing,
        }
    }

    /// Status on arrival.
    pub fn terminal_status(self) -> DoorStatus {
        match self {
            Direction::Opening => DoorStatus::Open,
            Direction::Closing => DoorStatus::Closed,
        }
    }

    /// Proc value on arrival.
    pub fn terminal_proc(self) -> f64 {
        match self {
            Direction::Opening => 1.0,
            Direction::Closing => 0.0,
        }
    }
}

/// Advance `proc` one tick: `proc += direction * simdt * operating_speed`,
/// clamped to `[0, 1]`.
///
/// `operating_speed` is the fraction of full travel covered per second.
pub fn integrate_proc(proc: f64, direction: Direction, simdt: f64, operating_speed: f64) -> f64 {
    let next = proc + direction.sign() * simdt * operating_speed;
    if next >= 1.0 - PROC_EPSILON {
        1.0
    } else if next <= PROC_EPSILON {
        0.0
    } else {
        next
    }
}

/// Coarse status for a non-failed door at `proc` travelling in `direction`.
pub fn derive_status(proc: f64, direction: Direction) -> DoorStatus {
    if proc <= 0.0 {
        DoorStatus::Closed
    } else if proc >= 1.0 {
        DoorStatus::Open
    } else {
        direction.moving_status()
    }
}

/// Resolve a status loaded without context (e.g. `NOT_SET` or a status that
/// disagrees with its proc) into one consistent with `proc`.
///
/// Moving statuses at an intermediate proc are kept as-is so a door saved
/// mid-travel reloads mid-travel.
pub fn reconcile_status(status: DoorStatus, proc: f64) -> DoorStatus {
    match status {
        DoorStatus::Failed => DoorStatus::Failed,
        DoorStatus::Opening | DoorStatus::Closing if proc > 0.0 && proc < 1.0 => status,
        DoorStatus::Opening if proc <= 0.0 => DoorStatus::Opening,
        DoorStatus::Closing if proc >= 1.0 => DoorStatus::Closing,
        _ => {
            if proc >= 1.0 {
                DoorStatus::Open
            } else if proc <= 0.0 {
                DoorStatus::Closed
            } else {
                // stationary mid-travel with no recorded direction: treat as closing
                DoorStatus::Closing
            }
        }
    }
}

/// Direction a toggle request moves a door in.
///
/// `Closed` and `Closing` doors open; everything else closes.
pub fn toggle_direction(current: DoorStatus) -> Direction {
    match current {
        DoorStatus::Closed | DoorStatus::Closing => Direction::Opening,
        _ => Direction::Closing,
    }
}

/// Seconds for a full transit at `operating_speed`.
pub fn transit_seconds(operating_speed: f64) -> f64 {
    if operating_speed > 0.0 {
        1.0 / operating_speed
    } else {
        f64::INFINITY
    }
}
