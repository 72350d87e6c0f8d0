//! The vessel state aggregate.
//!
//! [`VesselState`] owns every piece of mutable vessel state: the hecs world
//! holding one entity per fitted door, plus one resource struct per
//! vessel-wide concern. Post-steps and subsystems receive `&mut VesselState`
//! and nothing else, so the whole tick is a plain sequence of borrows.

use std::collections::HashMap;
use std::fmt;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xrvessel_logic::config::{DoorSpec, VesselConfig};
use xrvessel_logic::damage::{DamageItem, WarningLights};
use xrvessel_logic::door::{DoorId, DoorStatus};
use xrvessel_logic::thermal::ThermalState;

use crate::components::*;
use crate::damage::DamageTable;
use crate::notify::Notifier;
use crate::sound::{SilentSound, SoundEngine};

/// Misuse of the vessel API.
#[derive(Debug, Clone, PartialEq)]
pub enum VesselError {
    DoorNotFitted(DoorId),
    /// The door is `Failed`; only a repair brings it back.
    DoorFailed(DoorId),
    UnknownDamageItem(DamageItem),
}

impl fmt::Display for VesselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VesselError::DoorNotFitted(id) => write!(f, "door {:?} is not fitted to this vessel", id),
            VesselError::DoorFailed(id) => write!(f, "door {:?} has failed and needs repair", id),
            VesselError::UnknownDamageItem(item) => write!(f, "damage item {:?} does not exist on this vessel", item),
        }
    }
}

impl std::error::Error for VesselError {}

pub struct VesselState {
    pub config: VesselConfig,
    /// One entity per fitted door, each with a [`Door`] component.
    pub world: World,
    door_index: HashMap<DoorId, Entity>,

    /// Simulation time of the tick in progress.
    pub simt: f64,
    pub flight: FlightState,
    pub crew: CrewStatus,
    pub apu: ApuState,
    pub hydraulics: HydraulicResource,
    /// Ground cart cooling; uses the door statuses, `Open` is connected.
    pub external_cooling: DoorStatus,
    pub thermal: ThermalState,
    pub internal_systems_failure: bool,
    /// Cabin oxygen as a fraction of nominal.
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
    pub previous: PreviousFrame,
    pub notifier: Notifier,
    pub sound: Box<dyn SoundEngine>,
    pub rng: StdRng,
    pub(crate) damage_table: DamageTable,
}

impl VesselState {
    /// Fresh vessel: doors `NotSet` at proc 0, APU off with full tanks.
    pub fn new(config: VesselConfig) -> Self {
        Self::with_parts(config, Box::new(SilentSound), StdRng::from_entropy())
    }

    pub fn with_parts(config: VesselConfig, sound: Box<dyn SoundEngine>, rng: StdRng) -> Self {
        let mut world = World::new();
        let mut door_index = HashMap::new();
        for spec in &config.doors {
            let entity = world.spawn((Door::new(spec.id),));
            door_index.insert(spec.id, entity);
        }
        let damage_table = DamageTable::for_items(&config.damage_items());
        let apu = ApuState::full(config.apu_fuel_capacity_kg);

        let mut state = Self {
            config,
            world,
            door_index,
            simt: 0.0,
            flight: FlightState::default(),
            crew: CrewStatus::default(),
            apu,
            hydraulics: HydraulicResource::default(),
            external_cooling: DoorStatus::Closed,
            thermal: ThermalState::default(),
            internal_systems_failure: false,
            cabin_o2: 1.0,
            airframe: AirframeIntegrity::default(),
            lights: WarningLights::new(),
            mws: Mws::default(),
            crash: CrashState::default(),
            interlocks: InterlockOverrides::default(),
            centering: Centering::default(),
            timers: Default::default(),
            gauges: Gauges::default(),
            engines: EngineGates::default(),
            previous: PreviousFrame::default(),
            notifier: Notifier::new(),
            sound,
            rng,
            damage_table,
        };
        state.load_standard_sounds();
        state
    }

    // ========================================================================
    // DOORS
    // ========================================================================

    /// Fitted doors in configuration order.
    pub fn fitted_doors(&self) -> Vec<DoorId> {
        self.config.doors.iter().map(|d| d.id).collect()
    }

    pub fn has_door(&self, id: DoorId) -> bool {
        self.door_index.contains_key(&id)
    }

    pub fn door_spec(&self, id: DoorId) -> Option<&DoorSpec> {
        self.config.door(id)
    }

    /// Copy of a door's live state.
    pub fn door(&self, id: DoorId) -> Option<Door> {
        let entity = *self.door_index.get(&id)?;
        self.world.get::<&Door>(entity).ok().map(|d| *d)
    }

    /// Mutate a door in place. Returns `None` if the door is not fitted.
    pub fn with_door<R>(&mut self, id: DoorId, f: impl FnOnce(&mut Door) -> R) -> Option<R> {
        let entity = *self.door_index.get(&id)?;
        let mut door = self.world.get::<&mut Door>(entity).ok()?;
        Some(f(&mut *door))
    }

    /// Status of a door; doors not fitted read as `Closed`.
    pub fn door_status(&self, id: DoorId) -> DoorStatus {
        self.door(id).map_or(DoorStatus::Closed, |d| d.status)
    }

    pub fn door_proc(&self, id: DoorId) -> f64 {
        self.door(id).map_or(0.0, |d| d.proc)
    }

    /// Replace every door entity; used when restoring a snapshot.
    pub(crate) fn replace_doors(&mut self, doors: Vec<Door>) {
        self.world.clear();
        self.door_index.clear();
        for door in doors {
            if self.config.has_door(door.id) {
                let entity = self.world.spawn((door,));
                self.door_index.insert(door.id, entity);
            } else {
                log::warn!("ignoring saved door {:?}: not fitted to {}", door.id, self.config.vessel_type.name());
            }
        }
        for spec in &self.config.doors {
            if !self.door_index.contains_key(&spec.id) {
                let entity = self.world.spawn((Door::new(spec.id),));
                self.door_index.insert(spec.id, entity);
            }
        }
    }

    /// All doors in configuration order.
    pub fn doors(&self) -> Vec<Door> {
        self.config
            .doors
            .iter()
            .filter_map(|spec| self.door(spec.id))
            .collect()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_crashed(&self) -> bool {
        self.crash.is_crashed
    }

    /// On the ground and not rolling.
    pub fn is_landed(&self) -> bool {
        self.flight.ground_contact && self.flight.groundspeed < 0.1
    }

    /// Fuel remaining as a fraction of capacity.
    pub fn apu_fuel_frac(&self) -> f64 {
        if self.config.apu_fuel_capacity_kg > 0.0 {
            self.apu.fuel_qty_kg / self.config.apu_fuel_capacity_kg
        } else {
            0.0
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn rand(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    pub fn kill_crew(&mut self) {
        log::warn!("crew killed");
        self.crew.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrvessel_logic::config::VesselType;

    fn state() -> VesselState {
        let config = crate::config::builtin_config(VesselType::Xr1).expect("builtin config");
        VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_doors_start_not_set() {
        let s = state();
        assert!(!s.fitted_doors().is_empty());
        for door in s.doors() {
            assert_eq!(door.status, DoorStatus::NotSet);
            assert_eq!(door.proc, 0.0);
        }
    }

    #[test]
    fn test_unfitted_door_reads_closed() {
        let mut s = state();
        assert!(!s.has_door(DoorId::BayDoors));
        assert_eq!(s.door_status(DoorId::BayDoors), DoorStatus::Closed);
        assert!(s.with_door(DoorId::BayDoors, |d| d.fail()).is_none());
    }

    #[test]
    fn test_replace_doors_refills_missing() {
        let mut s = state();
        let gear = Door::new(DoorId::LandingGear).with_state(DoorStatus::Open, 1.0);
        s.replace_doors(vec![gear, Door::new(DoorId::Elevator)]);
        assert_eq!(s.door_status(DoorId::LandingGear), DoorStatus::Open);
        assert!(!s.has_door(DoorId::Elevator));
        assert_eq!(s.doors().len(), s.config.doors.len());
    }
}
