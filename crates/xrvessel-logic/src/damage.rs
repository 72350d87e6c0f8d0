//! Damage items and warning lights.
//!
//! Each [`DamageItem`] has a fixed display spec (label, short label, and
//! whether it is an online/offline item or carries partial integrity).
//! The mapping from items to live vessel state lives in `xrvessel-core`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::door::DoorId;

/// Display spec for a damage item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageSpec {
    pub label: &'static str,
    pub short_label: &'static str,
    /// Item is either working or failed, with no partial integrity.
    pub online_offline: bool,
}

/// Damageable components of the vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageItem {
    LeftWing,
    RightWing,
    LeftAileron,
    RightAileron,
    LandingGear,
    Nosecone,
    RetroDoors,
    Hatch,
    Radiator,
    Airbrake,
    MainEngineLeft,
    MainEngineRight,
    ScramEngineLeft,
    ScramEngineRight,
    HoverEngineFore,
    HoverEngineAft,
    RetroEngineLeft,
    RetroEngineRight,
    Rcs(u8),
    BayDoors,
    Elevator,
}

/// Number of RCS thruster groups.
pub const RCS_COUNT: u8 = 14;

const RCS_LABELS: [&str; RCS_COUNT as usize] = [
    "Forward Lower RCS",
    "Aft Upper RCS",
    "Forward Upper RCS",
    "Aft Lower RCS",
    "Forward Star. RCS",
    "Aft Port RCS",
    "Forward Port RCS",
    "Aft Star. RCS",
    "Outboard Upper Port RCS",
    "Outboard Lower Star. RCS",
    "Outboard Upper Star. RCS",
    "Outboard Lower Port RCS",
    "Aft RCS",
    "Forward RCS",
];

const RCS_SHORT_LABELS: [&str; RCS_COUNT as usize] = [
    "RCS1", "RCS2", "RCS3", "RCS4", "RCS5", "RCS6", "RCS7", "RCS8", "RCS9", "RCS10", "RCS11",
    "RCS12", "RCS13", "RCS14",
];

impl DamageItem {
    /// Items common to every vessel type, in scenario index order.
    pub fn common() -> Vec<DamageItem> {
        let mut items = vec![
            DamageItem::LeftWing,
            DamageItem::RightWing,
            DamageItem::LeftAileron,
            DamageItem::RightAileron,
            DamageItem::LandingGear,
            DamageItem::Nosecone,
            DamageItem::RetroDoors,
            DamageItem::Hatch,
            DamageItem::Radiator,
            DamageItem::Airbrake,
            DamageItem::MainEngineLeft,
            DamageItem::MainEngineRight,
            DamageItem::ScramEngineLeft,
            DamageItem::ScramEngineRight,
            DamageItem::HoverEngineFore,
            DamageItem::HoverEngineAft,
            DamageItem::RetroEngineLeft,
            DamageItem::RetroEngineRight,
        ];
        items.extend((0..RCS_COUNT).map(DamageItem::Rcs));
        items
    }

    pub fn spec(self) -> DamageSpec {
        let (label, short_label, online_offline) = match self {
            DamageItem::LeftWing => ("Left Wing", "LWng", false),
            DamageItem::RightWing => ("Right Wing", "RWng", false),
            DamageItem::LeftAileron => ("Left Aileron", "LAil", true),
            DamageItem::RightAileron => ("Right Aileron", "RAil", true),
            DamageItem::LandingGear => ("Landing Gear", "Gear", true),
            DamageItem::Nosecone => ("Nosecone", "Nose", true),
            DamageItem::RetroDoors => ("Retro Doors", "RDor", true),
            DamageItem::Hatch => ("Top Hatch", "Htch", true),
            DamageItem::Radiator => ("Radiator", "Rad", true),
            DamageItem::Airbrake => ("Airbrake", "Airb", true),
            DamageItem::MainEngineLeft => ("Left Main Engine", "LEng", false),
            DamageItem::MainEngineRight => ("Right Main Engine", "REng", false),
            DamageItem::ScramEngineLeft => ("Left SCRAM Engine", "LScr", false),
            DamageItem::ScramEngineRight => ("Right SCRAM Engine", "RScr", false),
            DamageItem::HoverEngineFore => ("Fore Hover Engine", "FHov", false),
            DamageItem::HoverEngineAft => ("Aft Hover Engine", "AHov", false),
            DamageItem::RetroEngineLeft => ("Left Retro Engine", "LRet", false),
            DamageItem::RetroEngineRight => ("Right Retro Engine", "RRet", false),
            DamageItem::Rcs(i) => {
                let idx = (i as usize).min(RCS_LABELS.len() - 1);
                (RCS_LABELS[idx], RCS_SHORT_LABELS[idx], false)
            }
            DamageItem::BayDoors => ("Payload Bay Doors", "BDor", true),
            DamageItem::Elevator => ("Crew Elevator", "Elev", true),
        };
        DamageSpec {
            label,
            short_label,
            online_offline,
        }
    }

    /// Door whose FAILED status this item reflects, if any.
    pub fn door(self) -> Option<DoorId> {
        match self {
            DamageItem::LandingGear => Some(DoorId::LandingGear),
            DamageItem::Nosecone => Some(DoorId::Nosecone),
            DamageItem::RetroDoors => Some(DoorId::RetroDoors),
            DamageItem::Hatch => Some(DoorId::Hatch),
            DamageItem::Radiator => Some(DoorId::Radiator),
            DamageItem::Airbrake => Some(DoorId::Airbrake),
            DamageItem::BayDoors => Some(DoorId::BayDoors),
            DamageItem::Elevator => Some(DoorId::Elevator),
            _ => None,
        }
    }

    /// Warning light lit while this item is damaged.
    pub fn warning_light(self) -> Option<WarningLight> {
        match self {
            DamageItem::LeftWing => Some(WarningLight::LeftWing),
            DamageItem::RightWing => Some(WarningLight::RightWing),
            DamageItem::LeftAileron => Some(WarningLight::LeftAileron),
            DamageItem::RightAileron => Some(WarningLight::RightAileron),
            DamageItem::LandingGear => Some(WarningLight::Gear),
            DamageItem::Nosecone => Some(WarningLight::Nose),
            DamageItem::RetroDoors => Some(WarningLight::RetroDoors),
            DamageItem::Hatch => Some(WarningLight::Hatch),
            DamageItem::Radiator => Some(WarningLight::Radiator),
            DamageItem::Airbrake => Some(WarningLight::Airbrake),
            DamageItem::MainEngineLeft | DamageItem::MainEngineRight => Some(WarningLight::MainEngines),
            DamageItem::ScramEngineLeft | DamageItem::ScramEngineRight => Some(WarningLight::ScramEngines),
            DamageItem::HoverEngineFore | DamageItem::HoverEngineAft => Some(WarningLight::HoverEngines),
            DamageItem::RetroEngineLeft | DamageItem::RetroEngineRight => Some(WarningLight::RetroEngines),
            DamageItem::Rcs(_) => Some(WarningLight::Rcs),
            DamageItem::BayDoors => Some(WarningLight::BayDoors),
            DamageItem::Elevator => Some(WarningLight::Elevator),
        }
    }
}

/// Master warning panel lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WarningLight {
    MainEngines,
    HoverEngines,
    ScramEngines,
    RetroEngines,
    LeftWing,
    RightWing,
    LeftAileron,
    RightAileron,
    Gear,
    Nose,
    RetroDoors,
    Hatch,
    Radiator,
    Airbrake,
    Rcs,
    HullTemp,
    DynamicPressure,
    Coolant,
    ApuFuel,
    BayDoors,
    Elevator,
}

impl WarningLight {
    pub fn all() -> &'static [WarningLight] {
        &[
            WarningLight::MainEngines,
            WarningLight::HoverEngines,
            WarningLight::ScramEngines,
            WarningLight::RetroEngines,
            WarningLight::LeftWing,
            WarningLight::RightWing,
            WarningLight::LeftAileron,
            WarningLight::RightAileron,
            WarningLight::Gear,
            WarningLight::Nose,
            WarningLight::RetroDoors,
            WarningLight::Hatch,
            WarningLight::Radiator,
            WarningLight::Airbrake,
            WarningLight::Rcs,
            WarningLight::HullTemp,
            WarningLight::DynamicPressure,
            WarningLight::Coolant,
            WarningLight::ApuFuel,
            WarningLight::BayDoors,
            WarningLight::Elevator,
        ]
    }
}

/// Set of lit warning lights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningLights {
    lit: BTreeSet<WarningLight>,
}

impl WarningLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, light: WarningLight, on: bool) {
        if on {
            self.lit.insert(light);
        } else {
            self.lit.remove(&light);
        }
    }

    pub fn is_lit(&self, light: WarningLight) -> bool {
        self.lit.contains(&light)
    }

    pub fn any_lit(&self) -> bool {
        !self.lit.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = WarningLight> + '_ {
        self.lit.iter().copied()
    }

    pub fn clear(&mut self) {
        self.lit.clear();
    }
}
