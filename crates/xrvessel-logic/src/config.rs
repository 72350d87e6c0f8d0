//! Vessel-type configuration.
//!
//! The XR1, XR2 Ravenstar and XR5 Vanguard share all of their door and
//! systems logic; what differs between them is data: which doors are
//! fitted, how fast each one moves, structural and thermal limits, APU
//! capacity. A [`VesselConfig`] carries that data and is loaded from the
//! JSON files under `data/` by `xrvessel-core`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{apu, coolant, ctok};
use crate::damage::{DamageItem, WarningLight};
use crate::door::DoorId;
use crate::thermal::HullSurface;

/// Vessel family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselType {
    #[serde(rename = "XR1")]
    Xr1,
    #[serde(rename = "XR2")]
    Xr2,
    #[serde(rename = "XR5")]
    Xr5,
}

impl VesselType {
    pub fn all() -> &'static [VesselType] {
        &[VesselType::Xr1, VesselType::Xr2, VesselType::Xr5]
    }

    pub fn name(self) -> &'static str {
        match self {
            VesselType::Xr1 => "XR1",
            VesselType::Xr2 => "XR2 Ravenstar",
            VesselType::Xr5 => "XR5 Vanguard",
        }
    }
}

// ============================================================================
// DOORS
// ============================================================================

/// Static description of one door or animated subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    pub id: DoorId,
    /// Player-facing name, e.g. "Landing Gear".
    pub label: String,
    /// Fraction of full travel per second.
    pub operating_speed: f64,
    #[serde(default = "default_true")]
    pub requires_hydraulics: bool,
    /// Dynamic pressure (Pa) at which the door fails when open.
    #[serde(default)]
    pub dynamic_pressure_limit: Option<f64>,
    /// Hull surface whose temperature stresses the door when open.
    #[serde(default)]
    pub surface: Option<HullSurface>,
    #[serde(default)]
    pub damage_item: Option<DamageItem>,
    #[serde(default)]
    pub warning_light: Option<WarningLight>,
    /// Message spoken when fully open instead of "<label> open."
    #[serde(default)]
    pub open_callout: Option<String>,
    /// Message spoken when fully closed instead of "<label> closed."
    #[serde(default)]
    pub closed_callout: Option<String>,
    /// Message spoken when starting to open instead of "<label> opening."
    #[serde(default)]
    pub opening_callout: Option<String>,
    #[serde(default)]
    pub closing_callout: Option<String>,
    /// Replaces "<label> is open: close it or reduce speed!"
    #[serde(default)]
    pub open_warning: Option<String>,
    /// Replaces "<label> inoperative due to excessive heat and/or dynamic pressure."
    #[serde(default)]
    pub inoperative_message: Option<String>,
    /// False for doors that only ever warn under stress.
    #[serde(default = "default_true")]
    pub can_fail: bool,
}

fn default_true() -> bool {
    true
}

impl DoorSpec {
    pub fn new(id: DoorId, label: impl Into<String>, operating_speed: f64) -> Self {
        Self {
            id,
            label: label.into(),
            operating_speed,
            requires_hydraulics: true,
            dynamic_pressure_limit: None,
            surface: None,
            damage_item: None,
            warning_light: None,
            open_callout: None,
            closed_callout: None,
            opening_callout: None,
            closing_callout: None,
            open_warning: None,
            inoperative_message: None,
            can_fail: true,
        }
    }

    pub fn without_hydraulics(mut self) -> Self {
        self.requires_hydraulics = false;
        self
    }

    pub fn with_dynamic_pressure_limit(mut self, pascals: f64) -> Self {
        self.dynamic_pressure_limit = Some(pascals);
        self
    }

    pub fn with_surface(mut self, surface: HullSurface) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_damage(mut self, item: DamageItem, light: WarningLight) -> Self {
        self.damage_item = Some(item);
        self.warning_light = Some(light);
        self
    }

    pub fn with_callouts(mut self, open: impl Into<String>, closed: impl Into<String>) -> Self {
        self.open_callout = Some(open.into());
        self.closed_callout = Some(closed.into());
        self
    }

    pub fn with_open_warning(mut self, message: impl Into<String>) -> Self {
        self.open_warning = Some(message.into());
        self
    }

    pub fn warn_only(mut self) -> Self {
        self.can_fail = false;
        self
    }

    /// Seconds for a full transit.
    pub fn duration(&self) -> f64 {
        crate::door::transit_seconds(self.operating_speed)
    }

    pub fn inoperative_message(&self) -> String {
        self.inoperative_message.clone().unwrap_or_else(|| {
            format!(
                "{} inoperative due to excessive heat and/or dynamic pressure.",
                self.label
            )
        })
    }

    pub fn failure_message(&self) -> String {
        format!(
            "{} FAILED due to excessive heat and/or dynamic pressure!",
            self.label
        )
    }

    pub fn open_warning(&self) -> String {
        self.open_warning
            .clone()
            .unwrap_or_else(|| format!("{} is open: close it or reduce speed!", self.label))
    }

    pub fn arrival_message(&self, opened: bool) -> String {
        let callout = if opened {
            &self.open_callout
        } else {
            &self.closed_callout
        };
        callout.clone().unwrap_or_else(|| {
            format!("{} {}.", self.label, if opened { "open" } else { "closed" })
        })
    }

    pub fn departure_message(&self, opening: bool) -> String {
        let callout = if opening {
            &self.opening_callout
        } else {
            &self.closing_callout
        };
        callout.clone().unwrap_or_else(|| {
            format!("{} {}.", self.label, if opening { "opening" } else { "closing" })
        })
    }
}

// ============================================================================
// LIMITS
// ============================================================================

/// Hull temperature limits in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullTemperatureLimits {
    pub nosecone: f64,
    pub wings: f64,
    pub cockpit: f64,
    pub top_hull: f64,
    /// Limit for any surface whose door is open.
    pub door_open: f64,
}

impl Default for HullTemperatureLimits {
    fn default() -> Self {
        Self {
            nosecone: 2840.0,
            wings: 2380.0,
            cockpit: 1490.0,
            top_hull: 1210.0,
            door_open: 480.0,
        }
    }
}

impl HullTemperatureLimits {
    /// Limit for `surface` in K.
    pub fn limit_k(&self, surface: HullSurface) -> f64 {
        let celsius = match surface {
            HullSurface::Nosecone | HullSurface::LowerHull => self.nosecone,
            HullSurface::LeftWing | HullSurface::RightWing | HullSurface::Wings => self.wings,
            HullSurface::Cockpit => self.cockpit,
            HullSurface::TopHull => self.top_hull,
        };
        ctok(celsius)
    }

    pub fn door_open_k(&self) -> f64 {
        ctok(self.door_open)
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Pilot-adjustable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselSettings {
    /// Seconds an idle APU may run before the pilot is nagged; 0 disables.
    pub apu_idle_runtime_callouts: f64,
    pub apu_auto_shutdown: bool,
    /// Index into [`apu::BURN_RATES`].
    pub apu_burn_rate: usize,
    /// Index into [`coolant::HEATING_RATES`].
    pub coolant_heating_rate: usize,
    pub crash_damage_enabled: bool,
    pub hull_heating_damage_enabled: bool,
    pub wing_stress_damage_enabled: bool,
    pub door_stress_damage_enabled: bool,
}

impl Default for VesselSettings {
    fn default() -> Self {
        Self {
            apu_idle_runtime_callouts: 20.0,
            apu_auto_shutdown: true,
            apu_burn_rate: 2,
            coolant_heating_rate: 1,
            crash_damage_enabled: true,
            hull_heating_damage_enabled: true,
            wing_stress_damage_enabled: true,
            door_stress_damage_enabled: true,
        }
    }
}

impl VesselSettings {
    pub fn apu_burn_kg_per_min(&self) -> f64 {
        apu::BURN_RATES
            .get(self.apu_burn_rate)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn coolant_heating_rate(&self) -> f64 {
        coolant::HEATING_RATES
            .get(self.coolant_heating_rate)
            .copied()
            .unwrap_or(0.0)
    }
}

/// A setting that was out of range and has been clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub field: &'static str,
    pub found: f64,
    pub used: f64,
}

/// Structural problems that make a configuration unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigInvalid {
    NoDoors,
    DuplicateDoor(DoorId),
    BadOperatingSpeed { door: DoorId, speed: f64 },
    BadCapacity(f64),
}

impl fmt::Display for ConfigInvalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigInvalid::NoDoors => write!(f, "no doors configured"),
            ConfigInvalid::DuplicateDoor(id) => write!(f, "door {:?} configured twice", id),
            ConfigInvalid::BadOperatingSpeed { door, speed } => {
                write!(f, "door {:?} has non-positive operating speed {}", door, speed)
            }
            ConfigInvalid::BadCapacity(c) => write!(f, "APU fuel capacity must be positive, got {}", c),
        }
    }
}

impl std::error::Error for ConfigInvalid {}

// ============================================================================
// VESSEL CONFIG
// ============================================================================

/// Complete data description of one vessel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselConfig {
    pub vessel_type: VesselType,
    pub doors: Vec<DoorSpec>,
    #[serde(default)]
    pub hull_limits: HullTemperatureLimits,
    /// Aerodynamic heating factor for the hull model.
    pub hull_heating_factor: f64,
    /// Coolant never exceeds this (°C).
    pub max_coolant_temp: f64,
    pub apu_fuel_capacity_kg: f64,
    /// Touchdown speed above which the crew is lightly injured (m/s).
    pub minor_injury_speed: f64,
    /// Altitude at which the gear touches the ground (m).
    pub gear_uncompressed_distance: f64,
    /// Items beyond [`DamageItem::common`] fitted to this type.
    #[serde(default)]
    pub extra_damage_items: Vec<DamageItem>,
    #[serde(default)]
    pub settings: VesselSettings,
}

impl VesselConfig {
    pub fn door(&self, id: DoorId) -> Option<&DoorSpec> {
        self.doors.iter().find(|d| d.id == id)
    }

    pub fn has_door(&self, id: DoorId) -> bool {
        self.door(id).is_some()
    }

    /// Every damage item on this vessel, in scenario index order.
    pub fn damage_items(&self) -> Vec<DamageItem> {
        let mut items = DamageItem::common();
        items.extend(self.extra_damage_items.iter().copied());
        items
    }

    /// Check structure, then clamp out-of-range settings.
    ///
    /// Returns the adjustments made so the caller can report them.
    pub fn validate(&mut self) -> Result<Vec<Adjustment>, ConfigInvalid> {
        if self.doors.is_empty() {
            return Err(ConfigInvalid::NoDoors);
        }
        for (i, door) in self.doors.iter().enumerate() {
            if !(door.operating_speed > 0.0) {
                return Err(ConfigInvalid::BadOperatingSpeed {
                    door: door.id,
                    speed: door.operating_speed,
                });
            }
            if self.doors[..i].iter().any(|d| d.id == door.id) {
                return Err(ConfigInvalid::DuplicateDoor(door.id));
            }
        }
        if !(self.apu_fuel_capacity_kg > 0.0) {
            return Err(ConfigInvalid::BadCapacity(self.apu_fuel_capacity_kg));
        }

        let mut adjustments = Vec::new();
        let s = &mut self.settings;

        let idle = s.apu_idle_runtime_callouts;
        if idle != 0.0 && !(5.0..=600.0).contains(&idle) {
            let used = if idle < 5.0 { 5.0 } else { 600.0 };
            adjustments.push(Adjustment {
                field: "apu_idle_runtime_callouts",
                found: idle,
                used,
            });
            s.apu_idle_runtime_callouts = used;
        }
        if s.apu_burn_rate >= apu::BURN_RATES.len() {
            let used = apu::BURN_RATES.len() - 1;
            adjustments.push(Adjustment {
                field: "apu_burn_rate",
                found: s.apu_burn_rate as f64,
                used: used as f64,
            });
            s.apu_burn_rate = used;
        }
        if s.coolant_heating_rate >= coolant::HEATING_RATES.len() {
            let used = coolant::HEATING_RATES.len() - 1;
            adjustments.push(Adjustment {
                field: "coolant_heating_rate",
                found: s.coolant_heating_rate as f64,
                used: used as f64,
            });
            s.coolant_heating_rate = used;
        }
        if self.max_coolant_temp < coolant::CRITICAL_TEMP {
            adjustments.push(Adjustment {
                field: "max_coolant_temp",
                found: self.max_coolant_temp,
                used: coolant::CRITICAL_TEMP,
            });
            self.max_coolant_temp = coolant::CRITICAL_TEMP;
        }
        Ok(adjustments)
    }
}
