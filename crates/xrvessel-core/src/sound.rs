//! Sound engine seam.
//!
//! The vessel never plays audio itself; it drives a [`SoundEngine`] owned by
//! the host. A missing engine degrades to [`SilentSound`]. [`ClipSound`]
//! simulates finite clip lengths against simulation time so the warning
//! debounce logic can run headless.

use std::any::Any;
use std::collections::HashMap;

use xrvessel_logic::door::DoorId;

/// Sound slots used by the vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundSlot {
    /// Beep when a request could not be performed.
    Error1,
    /// Master warning beep.
    WarningBeep,
    /// Voice warning channel; reloaded on demand.
    Warning,
    /// Voice information channel; reloaded on demand.
    Info,
    /// Hydraulic motor loop for one door.
    Hydraulics(DoorId),
    /// Door reaching its stop.
    DoorThump,
    ApuStartup,
    ApuRun,
    ApuShutdown,
    Crash,
}

/// Category of a sound, used by hosts to honour per-category volume settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundType {
    AudioStatusGreeting,
    InformationCallout,
    WarningCallout,
    Other,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Global,
    InternalOnly,
    Radio,
}

/// Standard sound files.
pub mod files {
    pub const ERROR1: &str = "Error1.wav";
    pub const WARNING_BEEP: &str = "Warning Beep.wav";
    pub const DOOR_THUMP: &str = "Door Opened Thump.wav";
    pub const HYDRAULICS: &str = "Hydraulics1.wav";
    pub const CHAMBER_PRESSURE: &str = "Airlock Chamber Pressure.wav";
    pub const APU_STARTUP: &str = "APU Startup.wav";
    pub const APU_RUN: &str = "APU Run.wav";
    pub const APU_SHUTDOWN: &str = "APU Shutdown.wav";
    pub const CRASH: &str = "Crash.wav";
    pub const APU_OFFLINE: &str = "Warning APU Offline.wav";
    pub const APU_FUEL_DEPLETED: &str = "Warning APU Fuel Depleted No Hydraulic Pressure.wav";
    pub const APU_NO_LOAD: &str = "Information APU Running.wav";
    pub const APU_FUEL_FULL: &str = "APU Fuel Tanks Full.wav";
    pub const APU_FUEL_LOW: &str = "Warning APU Fuel Low.wav";
    pub const COOLANT_CRITICAL: &str = "Warning Coolant Temperature Critical.wav";
    pub const COOLANT_WARNING: &str = "Warning Deploy Radiator.wav";
    pub const SYSTEMS_FAILURE: &str = "Warning Systems Failure.wav";
    pub const SYSTEMS_REBOOTED: &str = "Systems Rebooted.wav";
    pub const HULL_CRITICAL: &str = "Warning Hull Temperature Critical.wav";
    pub const HULL_OVERHEATING: &str = "Warning Airframe Overheating.wav";
    pub const HEAT_DAMAGE: &str = "Warning Heat Damage.wav";
    pub const DECOMPRESSION: &str = "Warning Decompression.wav";
    pub const DOOR_FAILURE: &str = "Warning Door Failure.wav";
    pub const DOOR_OPEN: &str = "Warning Door Open.wav";
    pub const WING_STRESS: &str = "Warning Wing Stress.wav";
    pub const WING_FAILURE: &str = "Warning Wing Failure.wav";
    pub const DYNAMIC_PRESSURE: &str = "Warning Dynamic Pressure.wav";
    pub const OUTER_DOOR_LOCKED: &str = "Warning Outer Door is Locked.wav";
    pub const INNER_DOOR_LOCKED: &str = "Warning Inner Door is Locked.wav";
    pub const HATCH_LOCKED: &str = "Warning Crew Hatch Locked.wav";
    pub const GEAR_LOCKED: &str = "Gear Locked.wav";
    pub const SHIP_DOCKED: &str = "Warning Ship is Docked.wav";
    pub const NOSECONE_CLOSED: &str = "Warning Nosecone is Closed.wav";
    pub const CHAMBER_IN_FLUX: &str = "Warning Chamber Pressure in Flux.wav";
    pub const EXTERNAL_PRESSURE_HIGHER: &str = "Warning External Pressure Higher than Chamber Pressure.wav";
    pub const INNER_DOOR_OPEN: &str = "Inner Door is Open.wav";
    pub const OUTER_DOOR_OPEN: &str = "Outer Door is Open.wav";
    pub const APU_FAILED: &str = "Warning Aux Power Unit Failure.wav";
    pub const DAMAGE_DETECTED: &str = "Ship Damage Detected.wav";
    pub const WARNING_CONDITIONS: &str = "Warning Conditions Detected.wav";
    pub const WELCOME_ABOARD: &str = "Welcome Aboard All Systems Nominal.wav";
    pub const ALL_SYSTEMS_NOMINAL: &str = "All Systems Nominal.wav";
}

/// Host sound service. Calls never block.
pub trait SoundEngine: Send {
    /// Whether a real engine is present. Ambient cues are only enabled when it is.
    fn is_loaded(&self) -> bool;
    fn load_sound(&mut self, slot: SoundSlot, file: &str, playback: Playback);
    fn play_sound(&mut self, slot: SoundSlot, sound_type: SoundType, volume: u8, looping: bool);
    fn stop_sound(&mut self, slot: SoundSlot);
    fn is_playing(&self, slot: SoundSlot) -> bool;
    /// Called once per tick before the post-steps with the current simulation time.
    fn update(&mut self, _simt: f64) {}
    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

/// No sound engine available: every call is a no-op.
#[derive(Debug, Default)]
pub struct SilentSound;

impl SoundEngine for SilentSound {
    fn is_loaded(&self) -> bool {
        false
    }
    fn load_sound(&mut self, _slot: SoundSlot, _file: &str, _playback: Playback) {}
    fn play_sound(&mut self, _slot: SoundSlot, _sound_type: SoundType, _volume: u8, _looping: bool) {}
    fn stop_sound(&mut self, _slot: SoundSlot) {}
    fn is_playing(&self, _slot: SoundSlot) -> bool {
        false
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One entry in the [`ClipSound`] play log.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    pub slot: SoundSlot,
    pub file: Option<String>,
    pub sound_type: SoundType,
    pub simt: f64,
}

#[derive(Debug, Clone, Default)]
struct Channel {
    file: Option<String>,
    started: f64,
    looping: bool,
    playing: bool,
}

/// In-memory engine where every clip lasts a fixed number of seconds of
/// simulation time.
#[derive(Debug)]
pub struct ClipSound {
    clip_seconds: f64,
    now: f64,
    channels: HashMap<SoundSlot, Channel>,
    played: Vec<PlayedSound>,
}

impl ClipSound {
    pub fn new(clip_seconds: f64) -> Self {
        Self {
            clip_seconds,
            now: 0.0,
            channels: HashMap::new(),
            played: Vec::new(),
        }
    }

    pub fn played(&self) -> &[PlayedSound] {
        &self.played
    }

    /// How many times `file` was started on any slot.
    pub fn play_count(&self, file: &str) -> usize {
        self.played
            .iter()
            .filter(|p| p.file.as_deref() == Some(file))
            .count()
    }

    pub fn slot_play_count(&self, slot: SoundSlot) -> usize {
        self.played.iter().filter(|p| p.slot == slot).count()
    }
}

impl Default for ClipSound {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl SoundEngine for ClipSound {
    fn is_loaded(&self) -> bool {
        true
    }

    fn load_sound(&mut self, slot: SoundSlot, file: &str, _playback: Playback) {
        let channel = self.channels.entry(slot).or_default();
        channel.file = Some(file.to_string());
        channel.playing = false;
    }

    fn play_sound(&mut self, slot: SoundSlot, sound_type: SoundType, _volume: u8, looping: bool) {
        let now = self.now;
        let channel = self.channels.entry(slot).or_default();
        channel.started = now;
        channel.looping = looping;
        channel.playing = true;
        self.played.push(PlayedSound {
            slot,
            file: channel.file.clone(),
            sound_type,
            simt: now,
        });
    }

    fn stop_sound(&mut self, slot: SoundSlot) {
        if let Some(channel) = self.channels.get_mut(&slot) {
            channel.playing = false;
        }
    }

    fn is_playing(&self, slot: SoundSlot) -> bool {
        self.channels.get(&slot).map_or(false, |c| {
            c.playing && (c.looping || self.now < c.started + self.clip_seconds)
        })
    }

    fn update(&mut self, simt: f64) {
        self.now = simt;
        let clip = self.clip_seconds;
        for channel in self.channels.values_mut() {
            if channel.playing && !channel.looping && simt >= channel.started + clip {
                channel.playing = false;
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
