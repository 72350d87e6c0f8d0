//! Damage and failure coupling.
//!
//! Environmental stress (dynamic pressure, hull heat, wing load) damages
//! doors and airframe parts; enough of it crashes the ship. Every damageable
//! part is reachable through one [`DamageTable`] built per vessel type, so
//! persistence, the MDA status screens and repairs all go through
//! [`VesselState::damage_status`] and [`VesselState::set_damage_status`].

use rand::Rng;
use xrvessel_logic::constants::{crash, hull, wings};
use xrvessel_logic::damage::{DamageItem, WarningLight};
use xrvessel_logic::door::{DoorId, DoorStatus};

use crate::components::AirframeIntegrity;
use crate::sound::{files, SoundSlot, SoundType};
use crate::vessel::{VesselError, VesselState};

/// Snapshot of one damage item for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageStatus {
    pub item: DamageItem,
    /// 1.0 = fully operational.
    pub frac_integrity: f64,
    pub label: String,
    pub short_label: &'static str,
    pub online_offline: bool,
}

type Getter = fn(&VesselState, DamageItem) -> f64;
type Setter = fn(&mut VesselState, DamageItem, f64);

#[derive(Clone, Copy)]
struct DamageBinding {
    item: DamageItem,
    get: Getter,
    set: Setter,
}

/// Item → accessor/setter bindings for one vessel type, in scenario order.
#[derive(Clone, Default)]
pub struct DamageTable {
    bindings: Vec<DamageBinding>,
}

impl DamageTable {
    pub fn for_items(items: &[DamageItem]) -> Self {
        Self {
            bindings: items.iter().map(|&item| bind(item)).collect(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = DamageItem> + '_ {
        self.bindings.iter().map(|b| b.item)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn binding(&self, item: DamageItem) -> Option<DamageBinding> {
        self.bindings.iter().find(|b| b.item == item).copied()
    }
}

fn bind(item: DamageItem) -> DamageBinding {
    let (get, set): (Getter, Setter) = match item {
        DamageItem::LeftWing | DamageItem::RightWing => (get_wing, set_wing),
        DamageItem::LeftAileron | DamageItem::RightAileron => (get_aileron, set_aileron),
        DamageItem::LandingGear
        | DamageItem::Nosecone
        | DamageItem::RetroDoors
        | DamageItem::Hatch
        | DamageItem::Radiator
        | DamageItem::Airbrake
        | DamageItem::BayDoors
        | DamageItem::Elevator => (get_door, set_door),
        DamageItem::MainEngineLeft
        | DamageItem::MainEngineRight
        | DamageItem::ScramEngineLeft
        | DamageItem::ScramEngineRight
        | DamageItem::HoverEngineFore
        | DamageItem::HoverEngineAft
        | DamageItem::RetroEngineLeft
        | DamageItem::RetroEngineRight
        | DamageItem::Rcs(_) => (get_engine, set_engine),
    };
    DamageBinding { item, get, set }
}

// ============================================================================
// ACCESSORS
// ============================================================================

fn get_wing(s: &VesselState, item: DamageItem) -> f64 {
    if item == DamageItem::LeftWing {
        s.airframe.left_wing
    } else {
        s.airframe.right_wing
    }
}

fn set_wing(s: &mut VesselState, item: DamageItem, frac: f64) {
    if item == DamageItem::LeftWing {
        s.airframe.left_wing = frac;
    } else {
        s.airframe.right_wing = frac;
    }
}

fn get_aileron(s: &VesselState, item: DamageItem) -> f64 {
    let failed = if item == DamageItem::LeftAileron {
        s.airframe.left_aileron_failed
    } else {
        s.airframe.right_aileron_failed
    };
    if failed {
        0.0
    } else {
        1.0
    }
}

fn set_aileron(s: &mut VesselState, item: DamageItem, frac: f64) {
    let failed = frac < 1.0;
    if item == DamageItem::LeftAileron {
        s.airframe.left_aileron_failed = failed;
    } else {
        s.airframe.right_aileron_failed = failed;
    }
}

fn get_door(s: &VesselState, item: DamageItem) -> f64 {
    match item.door().and_then(|id| s.door(id)) {
        Some(door) if door.is_failed() => 0.0,
        _ => 1.0,
    }
}

fn set_door(s: &mut VesselState, item: DamageItem, frac: f64) {
    let Some(id) = item.door() else { return };
    if frac < 1.0 {
        s.fail_door(id);
    } else {
        s.with_door(id, |door| door.repair());
    }
}

fn engine_slot(a: &mut AirframeIntegrity, item: DamageItem) -> Option<&mut f64> {
    match item {
        DamageItem::MainEngineLeft => Some(&mut a.main_engines[0]),
        DamageItem::MainEngineRight => Some(&mut a.main_engines[1]),
        DamageItem::ScramEngineLeft => Some(&mut a.scram_engines[0]),
        DamageItem::ScramEngineRight => Some(&mut a.scram_engines[1]),
        DamageItem::HoverEngineFore => Some(&mut a.hover_engines[0]),
        DamageItem::HoverEngineAft => Some(&mut a.hover_engines[1]),
        DamageItem::RetroEngineLeft => Some(&mut a.retro_engines[0]),
        DamageItem::RetroEngineRight => Some(&mut a.retro_engines[1]),
        DamageItem::Rcs(i) => a.rcs.get_mut(i as usize),
        _ => None,
    }
}

fn get_engine(s: &VesselState, item: DamageItem) -> f64 {
    let a = &s.airframe;
    match item {
        DamageItem::MainEngineLeft => a.main_engines[0],
        DamageItem::MainEngineRight => a.main_engines[1],
        DamageItem::ScramEngineLeft => a.scram_engines[0],
        DamageItem::ScramEngineRight => a.scram_engines[1],
        DamageItem::HoverEngineFore => a.hover_engines[0],
        DamageItem::HoverEngineAft => a.hover_engines[1],
        DamageItem::RetroEngineLeft => a.retro_engines[0],
        DamageItem::RetroEngineRight => a.retro_engines[1],
        DamageItem::Rcs(i) => a.rcs.get(i as usize).copied().unwrap_or(1.0),
        _ => 1.0,
    }
}

fn set_engine(s: &mut VesselState, item: DamageItem, frac: f64) {
    if let Some(slot) = engine_slot(&mut s.airframe, item) {
        *slot = frac;
    }
}

// ============================================================================
// STATUS
// ============================================================================

impl VesselState {
    /// Damage items fitted to this vessel, in scenario order.
    pub fn damage_items(&self) -> Vec<DamageItem> {
        self.damage_table.items().collect()
    }

    pub fn damage_status(&self, item: DamageItem) -> Result<DamageStatus, VesselError> {
        let binding = self
            .damage_table
            .binding(item)
            .ok_or(VesselError::UnknownDamageItem(item))?;
        let spec = item.spec();
        // doors carry the per-type label, e.g. the XR5 docking port
        let label = item
            .door()
            .and_then(|id| self.door_spec(id))
            .map_or_else(|| spec.label.to_string(), |d| d.label.clone());
        Ok(DamageStatus {
            item,
            frac_integrity: (binding.get)(self, item),
            label,
            short_label: spec.short_label,
            online_offline: spec.online_offline,
        })
    }

    /// Integrity of an item; unknown items read as intact.
    pub fn integrity(&self, item: DamageItem) -> f64 {
        self.damage_table
            .binding(item)
            .map_or(1.0, |b| (b.get)(self, item))
    }

    /// Apply an integrity value. A door below 1.0 fails, at 1.0 it is
    /// repaired. The item's warning light is lit when damaged but never
    /// cleared here.
    pub fn set_damage_status(&mut self, item: DamageItem, frac_integrity: f64) -> Result<(), VesselError> {
        let binding = self
            .damage_table
            .binding(item)
            .ok_or(VesselError::UnknownDamageItem(item))?;
        let frac = frac_integrity.clamp(0.0, 1.0);
        (binding.set)(self, item, frac);
        if frac < 1.0 {
            if let Some(light) = item.warning_light() {
                self.lights.set(light, true);
            }
        }
        Ok(())
    }

    /// Restore an item to full integrity and clear its light once nothing
    /// else sharing the light is still damaged.
    pub fn repair(&mut self, item: DamageItem) -> Result<(), VesselError> {
        self.set_damage_status(item, 1.0)?;
        if let Some(light) = item.warning_light() {
            let still_damaged = self
                .damage_table
                .items()
                .any(|other| other.warning_light() == Some(light) && self.integrity(other) < 1.0);
            if !still_damaged {
                self.lights.set(light, false);
            }
        }
        log::info!("repaired {}", item.spec().label);
        Ok(())
    }

    pub fn repair_all(&mut self) {
        for item in self.damage_items() {
            // items come from the table, so this cannot fail
            let _ = self.repair(item);
        }
    }

    pub fn is_damage_present(&self) -> bool {
        self.damage_table.items().any(|item| self.integrity(item) < 1.0)
    }

    /// Anything that should keep the master warning going.
    pub fn is_warning_present(&self) -> bool {
        self.lights.any_lit() || self.apu.warning || self.crew.incapacitated_or_no_pilot()
    }

    pub(crate) fn fail_door(&mut self, id: DoorId) {
        if self.with_door(id, |door| door.fail()).is_some() {
            self.sound.stop_sound(SoundSlot::Hydraulics(id));
        }
    }

    fn door_exposed(&self, id: DoorId) -> bool {
        self.has_door(id) && self.door_status(id) != DoorStatus::Closed
    }

    // ========================================================================
    // DOOR STRESS
    // ========================================================================

    /// Check one door against dynamic pressure and hull heat. Returns true
    /// on a new failure.
    pub fn check_door_failure(&mut self, id: DoorId) -> bool {
        let Some(spec) = self.door_spec(id).cloned() else {
            return false;
        };
        let status = self.door_status(id);
        if status == DoorStatus::Failed {
            return false;
        }
        if !status.is_exposed() {
            if let Some(light) = spec.warning_light {
                self.lights.set(light, false);
            }
            return false;
        }

        let dynp = self.flight.dynamic_pressure;
        let door_open_limit = self.config.hull_limits.door_open_k();
        let temp = spec.surface.map(|s| s.temperature(&self.thermal));

        let failing = spec.dynamic_pressure_limit.map_or(false, |lim| dynp >= lim)
            || temp.map_or(false, |t| t > door_open_limit);
        let warning = spec
            .dynamic_pressure_limit
            .map_or(false, |lim| dynp >= lim * hull::DOOR_OPEN_WARNING_FRAC)
            || temp.map_or(false, |t| t >= door_open_limit * hull::DOOR_OPEN_WARNING_FRAC);

        if failing && spec.can_fail {
            log::warn!("{} failed at {:.0} Pa", spec.label, dynp);
            self.show_warning(
                Some(files::DOOR_FAILURE),
                SoundType::WarningCallout,
                &spec.failure_message(),
                true,
            );
            self.fail_door(id);
            if let Some(light) = spec.warning_light {
                self.lights.set(light, true);
            }
            return true;
        }
        if failing || warning {
            self.show_warning(
                Some(files::DOOR_OPEN),
                SoundType::WarningCallout,
                &spec.open_warning(),
                false,
            );
            if let Some(light) = spec.warning_light {
                self.lights.set(light, true);
            }
        } else if let Some(light) = spec.warning_light {
            self.lights.set(light, false);
        }
        false
    }

    // ========================================================================
    // HULL HEATING
    // ========================================================================

    /// Check one surface temperature. Returns how far over its limit the
    /// surface is (e.g. 0.2 = 20% over) when heat damage occurred this tick,
    /// otherwise 0.
    pub fn check_temperature(&mut self, temp_k: f64, limit_k: f64, door_open: bool, simdt: f64) -> f64 {
        let limit_k = if door_open {
            self.config.hull_limits.door_open_k()
        } else {
            limit_k
        };

        if temp_k > limit_k {
            self.lights.set(WarningLight::HullTemp, true);
            let exceeded = (temp_k / limit_k).powi(2);
            let probability = simdt / hull::MEAN_TIME_TO_DAMAGE * exceeded;
            if self.rand() <= probability {
                self.show_warning(
                    Some(files::HEAT_DAMAGE),
                    SoundType::WarningCallout,
                    "WARNING: HEAT DAMAGE!",
                    true,
                );
                return exceeded - 1.0;
            }
            self.show_warning(
                Some(files::HULL_OVERHEATING),
                SoundType::WarningCallout,
                "WARNING: AIRFRAME OVERHEATING!",
                false,
            );
        } else if temp_k >= hull::CRITICAL_FRAC * limit_k {
            self.lights.set(WarningLight::HullTemp, true);
            self.show_warning(
                Some(files::HULL_CRITICAL),
                SoundType::WarningCallout,
                "WARNING: HULL TEMP. CRITICAL!",
                false,
            );
        }
        0.0
    }

    /// Check every hull surface. Breaches of anything but a wing crash the
    /// ship. Returns true on new wing damage.
    pub fn check_hull_heating_damage(&mut self, simdt: f64) -> bool {
        use xrvessel_logic::thermal::HullSurface;

        self.lights.set(WarningLight::HullTemp, false);
        let mut new_damage = false;
        let mach = self.flight.mach;
        let limits = self.config.hull_limits;
        let t = self.thermal;

        let nose_limit = limits.limit_k(HullSurface::Nosecone);
        if self.check_temperature(t.nosecone_temp, nose_limit, self.door_exposed(DoorId::Nosecone), simdt) != 0.0 {
            self.do_crash(&format!("NOSECONE BREACH at Mach {:.1}!", mach), 0.0);
        }

        // each open door is its own chance of a breach
        let hover_open = self.door_exposed(DoorId::HoverDoors);
        let gear_open = self.door_exposed(DoorId::LandingGear);
        if self.check_temperature(t.nosecone_temp, nose_limit, hover_open, simdt) != 0.0
            || self.check_temperature(t.nosecone_temp, nose_limit, gear_open, simdt) != 0.0
        {
            self.do_crash(&format!("LOWER HULL BREACH at Mach {:.1}!", mach), 0.0);
        }

        let wing_limit = limits.limit_k(HullSurface::Wings);
        let retro_open = self.door_exposed(DoorId::RetroDoors);
        for (item, temp, side) in [
            (DamageItem::LeftWing, t.left_wing_temp, "LEFT"),
            (DamageItem::RightWing, t.right_wing_temp, "RIGHT"),
        ] {
            let alpha = self.check_temperature(temp, wing_limit, retro_open, simdt);
            if alpha == 0.0 {
                continue;
            }
            let remaining = self.integrity(item) * (1.0 - alpha).max(0.0);
            let _ = self.set_damage_status(item, remaining);
            if self.rand() > remaining {
                self.do_crash(&format!("{} WING BREACH at Mach {:.1}!", side, mach), 0.0);
            } else {
                let msg = format!(
                    "{} WING DAMAGE at Mach {:.1}!&Wing Integrity={:.1}%",
                    side,
                    mach,
                    remaining * 100.0
                );
                self.show_warning(None, SoundType::None, &msg, true);
                new_damage = true;
            }
        }

        let cockpit_limit = limits.limit_k(HullSurface::Cockpit);
        if self.check_temperature(t.cockpit_temp, cockpit_limit, self.door_exposed(DoorId::Hatch), simdt) != 0.0 {
            self.do_crash(&format!("COCKPIT BREACH at Mach {:.1}!", mach), 0.0);
        }

        let top_limit = limits.limit_k(HullSurface::TopHull);
        let radiator_open = self.door_exposed(DoorId::Radiator);
        let bay_open = self.door_exposed(DoorId::BayDoors);
        if self.check_temperature(t.top_hull_temp, top_limit, radiator_open, simdt) != 0.0
            || self.check_temperature(t.top_hull_temp, top_limit, bay_open, simdt) != 0.0
        {
            self.do_crash(&format!("TOP HULL BREACH at Mach {:.1}!", mach), 0.0);
        }

        new_damage
    }

    // ========================================================================
    // WING STRESS
    // ========================================================================

    /// Wing load and dynamic pressure stress. Returns true while the
    /// airframe is over a limit or within 85% of one.
    pub fn check_wing_stress(&mut self, simdt: f64) -> bool {
        let load = self.flight.wing_load;
        let dynp = self.flight.dynamic_pressure;

        if load > wings::MAX_WING_LOAD || load < wings::MAX_NEGATIVE_WING_LOAD || dynp > wings::MAX_DYNAMIC_PRESSURE {
            let load_excess = if load > 0.0 {
                load - wings::MAX_WING_LOAD
            } else {
                wings::MAX_NEGATIVE_WING_LOAD - load
            };
            let alpha = ((dynp - wings::MAX_DYNAMIC_PRESSURE) * 1e-5).max(load_excess * 5e-5);
            let probability = 1.0 - (-alpha * simdt).exp();
            if self.rand() < probability {
                let msg = match self.rng.gen_range(0..4) {
                    0 => {
                        let frac = self.airframe.left_wing * (-alpha * self.rand()).exp();
                        let _ = self.set_damage_status(DamageItem::LeftWing, frac);
                        "Left Wing Failure!"
                    }
                    1 => {
                        let frac = self.airframe.right_wing * (-alpha * self.rand()).exp();
                        let _ = self.set_damage_status(DamageItem::RightWing, frac);
                        "Right Wing Failure!"
                    }
                    2 => {
                        let _ = self.set_damage_status(DamageItem::LeftAileron, 0.0);
                        self.fail_airbrake();
                        "Left Aileron Failure!"
                    }
                    _ => {
                        let _ = self.set_damage_status(DamageItem::RightAileron, 0.0);
                        self.fail_airbrake();
                        "Right Aileron Failure!"
                    }
                };
                log::warn!("{} (alpha {:.3})", msg, alpha);
                self.show_warning(Some(files::WING_FAILURE), SoundType::WarningCallout, msg, false);
            }
            return true;
        }

        let mut new_damage = false;
        let mut wing_lights_on = false;
        let threshold = wings::WARNING_FRAC;

        if load > wings::MAX_WING_LOAD * threshold {
            self.show_warning(
                Some(files::WING_STRESS),
                SoundType::WarningCallout,
                "Wing load over 85% of maximum.",
                false,
            );
            self.set_wing_lights();
            wing_lights_on = true;
            new_damage = true;
        } else {
            self.clear_wing_lights();
        }

        if load < wings::MAX_NEGATIVE_WING_LOAD * threshold {
            self.show_warning(
                Some(files::WING_STRESS),
                SoundType::WarningCallout,
                "Negative wing load over 85%&of maximum.",
                false,
            );
            self.set_wing_lights();
            new_damage = true;
        } else if !wing_lights_on {
            self.clear_wing_lights();
        }

        if dynp > wings::MAX_DYNAMIC_PRESSURE * threshold {
            self.show_warning(
                Some(files::DYNAMIC_PRESSURE),
                SoundType::WarningCallout,
                "Dynamic pressure over 85%&of maximum.",
                false,
            );
            self.lights.set(WarningLight::DynamicPressure, true);
            new_damage = true;
        } else {
            self.lights.set(WarningLight::DynamicPressure, false);
        }

        new_damage
    }

    fn set_wing_lights(&mut self) {
        self.lights.set(WarningLight::LeftWing, true);
        self.lights.set(WarningLight::RightWing, true);
    }

    /// Damaged wings keep their lights.
    fn clear_wing_lights(&mut self) {
        if self.airframe.left_wing >= 1.0 {
            self.lights.set(WarningLight::LeftWing, false);
        }
        if self.airframe.right_wing >= 1.0 {
            self.lights.set(WarningLight::RightWing, false);
        }
    }

    fn fail_airbrake(&mut self) {
        self.fail_door(DoorId::Airbrake);
        self.lights.set(WarningLight::Airbrake, true);
    }

    // ========================================================================
    // CRASH
    // ========================================================================

    /// Crash the ship. Does nothing if crash damage is disabled or the ship
    /// has already crashed. `touchdown_speed` of 0 (or less) is a
    /// non-survivable breach.
    pub fn do_crash(&mut self, message: &str, touchdown_speed: f64) {
        if !self.config.settings.crash_damage_enabled || self.crash.is_crashed {
            return;
        }

        let mut msg = message.to_string();
        if touchdown_speed > 0.0 {
            msg.push_str(&format!("&Vertical Impact Velocity = {:.2} m/s", touchdown_speed));
        }

        if self.crew.count > 0 {
            if touchdown_speed <= 0.0
                || touchdown_speed > crash::FATAL_SPEED
                || self.crew.state == crate::components::CrewState::Dead
            {
                msg.push_str("&You and the crew are DEAD!");
                self.kill_crew();
            } else if touchdown_speed > crash::SEVERE_INJURY_SPEED {
                msg.push_str("&You and the crew&sustained SEVERE INJURIES,&but you survived!");
                self.crew.state = crate::components::CrewState::Incapacitated;
            } else if touchdown_speed > crash::MODERATE_INJURY_SPEED {
                msg.push_str("&You and the crew&sustained MODERATE INJURIES,&but you survived!");
            } else if touchdown_speed > self.config.minor_injury_speed {
                msg.push_str("&You and the crew&sustained MINOR INJURIES.");
            } else {
                msg.push_str("&You and the crew are UNINJURED.");
            }
        }

        log::warn!("crash: {}", msg.replace('&', " "));
        self.crash.message = msg.clone();
        self.sound.play_sound(SoundSlot::Crash, SoundType::Other, 255, false);
        self.show_warning(None, SoundType::None, &msg, true);

        let mut balance = self.rand() * 6.0 + 3.0;
        if self.rand() < 0.5 {
            balance = -balance;
        }
        self.airframe.damaged_wing_balance = balance;

        // last, so the crash warning above still shows
        self.crash.is_crashed = true;
    }

    /// Wreck everything. Applied once, by the damage post-step, after a crash.
    pub fn perform_crash_damage(&mut self) {
        for light in WarningLight::all() {
            self.lights.set(*light, true);
        }

        for spec in self.config.doors.clone() {
            if spec.damage_item.is_some() || spec.id == DoorId::HoverDoors {
                self.fail_door(spec.id);
            }
        }

        if self.airframe.left_wing >= 1.0 {
            self.airframe.left_wing = self.rand() * 0.5;
        }
        if self.airframe.right_wing >= 1.0 {
            self.airframe.right_wing = self.rand() * 0.5;
        }
        self.airframe.left_aileron_failed = true;
        self.airframe.right_aileron_failed = true;

        for item in self.damage_items() {
            if let Some(slot) = engine_slot(&mut self.airframe, item) {
                *slot = 0.0;
            }
        }

        self.apu.status = DoorStatus::Failed;
        self.apu.warning = true;
        self.apu.fuel_qty_kg = 0.0;
        self.sound.stop_sound(SoundSlot::ApuRun);
        self.crash.processed = true;
        log::info!("crash damage applied");
    }

    /// The cabin vents to space through the open airlock.
    pub fn decompress_cabin(&mut self) {
        let msg = if self.crew.state != crate::components::CrewState::Dead && self.crew.count > 0 {
            self.kill_crew();
            "DECOMPRESSION! CREW IS DEAD!!"
        } else {
            "DECOMPRESSION!"
        };
        log::warn!("{}", msg);
        self.show_warning(None, SoundType::None, msg, true);
        self.crash.message = msg.to_string();
        self.sound.play_sound(SoundSlot::Crash, SoundType::Other, 255, false);
        self.cabin_o2 = 0.0;
        self.mws.active = true;
    }
}
