//! Warning channel pacing, the startup callout and the MWS blinker.

use xrvessel_logic::constants::notify::{STARTUP_CALLOUT_SIMT, WARNING_REPEAT_COOLDOWN};

use super::{PrePostStep, StepContext};
use crate::components::CrewState;
use crate::sound::{files, Playback, SoundSlot, SoundType};
use crate::vessel::VesselState;

/// Plays the queued warning callout at most once per tick.
///
/// A callout identical to the one that just finished waits
/// [`WARNING_REPEAT_COOLDOWN`] seconds after it ends; a different callout
/// plays as soon as the channel is free, and a forced one interrupts.
pub struct ShowWarningPostStep {
    playing_previous_step: bool,
    last_played: Option<String>,
    min_repeat_simt: f64,
    performed_startup_check: bool,
}

impl ShowWarningPostStep {
    pub fn new() -> Self {
        Self {
            playing_previous_step: false,
            last_played: None,
            min_repeat_simt: 0.0,
            performed_startup_check: false,
        }
    }

    fn is_repeat(&self, file: &str) -> bool {
        self.last_played.as_deref() == Some(file)
    }

    fn startup_check(&mut self, state: &mut VesselState) {
        self.performed_startup_check = true;
        let crew = state.crew.clone();
        if crew.state == CrewState::Dead {
            state.show_warning(None, SoundType::None, "CREW IS DEAD!", false);
        } else if crew.count == 0 {
            state.show_warning(None, SoundType::None, "NO CREW ON BOARD!", false);
        } else if crew.state == CrewState::Incapacitated {
            state.show_warning(None, SoundType::None, "CREW IS UNCONSCIOUS!", false);
        } else if !crew.pilot_aboard {
            state.show_warning(None, SoundType::None, "NO PILOT ON BOARD!", false);
        } else if state.is_damage_present() {
            state.mws.active = true;
            state.show_warning(
                Some(files::DAMAGE_DETECTED),
                SoundType::WarningCallout,
                "Ship damage detected!&Check MDA status screens.",
                false,
            );
        } else if state.is_warning_present() {
            state.mws.active = true;
            state.show_warning(
                Some(files::WARNING_CONDITIONS),
                SoundType::WarningCallout,
                "Warning condition(s) detected!&Check MWS lights.",
                false,
            );
        } else if state.is_landed() || state.flight.docked || state.flight.parking_brake {
            state.show_info(
                Some(files::WELCOME_ABOARD),
                SoundType::AudioStatusGreeting,
                "Welcome aboard, Commander!&All systems nominal.",
            );
        } else {
            state.show_info(
                Some(files::ALL_SYSTEMS_NOMINAL),
                SoundType::AudioStatusGreeting,
                "All systems nominal.",
            );
        }
    }
}

impl Default for ShowWarningPostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PrePostStep for ShowWarningPostStep {
    fn name(&self) -> &'static str {
        "ShowWarning"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        if state.is_crashed() {
            return;
        }
        let simt = ctx.simt;
        let playing_now = state.sound.is_playing(SoundSlot::Warning);

        // the same callout is still queued when its previous rendition ends
        if self.playing_previous_step && !playing_now {
            if let Some(pending) = &state.notifier.pending {
                if self.is_repeat(&pending.sound_file) {
                    self.min_repeat_simt = simt + WARNING_REPEAT_COOLDOWN;
                }
            }
        }

        if let Some(pending) = state.notifier.take_pending() {
            let repeat = self.is_repeat(&pending.sound_file);
            let channel_free = pending.forced || !playing_now;
            let allowed = pending.forced || !repeat || simt > self.min_repeat_simt;
            if channel_free && allowed {
                state
                    .sound
                    .load_sound(SoundSlot::Warning, &pending.sound_file, Playback::Radio);
                state.sound.play_sound(SoundSlot::Warning, pending.sound_type, 255, false);
                self.last_played = Some(pending.sound_file);
            } else {
                // deferred: keep it for a later tick unless something newer replaced it
                let mut deferred = pending;
                deferred.forced = false;
                if state.notifier.pending.is_none() {
                    state.notifier.pending = Some(deferred);
                }
            }
        }

        self.playing_previous_step = playing_now;

        if simt > STARTUP_CALLOUT_SIMT && !self.performed_startup_check {
            self.startup_check(state);
        }
    }
}

/// Blinks the master warning light twice a second while the MWS is active.
pub struct ManageMwsPostStep;

impl PrePostStep for ManageMwsPostStep {
    fn name(&self) -> &'static str {
        "ManageMws"
    }

    fn step(&mut self, ctx: &StepContext<'_>, state: &mut VesselState) {
        if state.mws.active {
            let lit = ctx.simt.fract() < 0.5;
            if lit != state.mws.lit {
                state.mws.lit = lit;
                if lit {
                    state.sound.play_sound(SoundSlot::WarningBeep, SoundType::Other, 255, false);
                }
            }
        } else {
            state.mws.lit = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FlightState;
    use crate::sound::ClipSound;
    use crate::subsystems::SubsystemTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xrvessel_logic::config::VesselType;

    fn setup() -> (VesselState, SubsystemTable) {
        let config = crate::config::builtin_config(VesselType::Xr1).expect("builtin config");
        let table = SubsystemTable::for_config(&config);
        let s = VesselState::with_parts(config, Box::new(ClipSound::new(2.0)), StdRng::seed_from_u64(12));
        (s, table)
    }

    fn clip(state: &VesselState) -> &ClipSound {
        state
            .sound
            .as_any()
            .downcast_ref::<ClipSound>()
            .expect("clip sound")
    }

    #[test]
    fn test_forced_warning_interrupts() {
        let (mut s, table) = setup();
        let mut step = ShowWarningPostStep::new();
        step.performed_startup_check = true;
        let ctx = StepContext {
            simt: 0.5,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        s.show_warning(Some("a.wav"), SoundType::WarningCallout, "A", false);
        step.step(&ctx, &mut s);
        s.show_warning(Some("b.wav"), SoundType::WarningCallout, "B", false);
        step.step(&ctx, &mut s);
        assert_eq!(clip(&s).play_count("b.wav"), 0);

        s.show_warning(Some("c.wav"), SoundType::WarningCallout, "C", true);
        step.step(&ctx, &mut s);
        assert_eq!(clip(&s).play_count("c.wav"), 1);
    }

    #[test]
    fn test_startup_greeting_when_landed() {
        let (mut s, table) = setup();
        s.flight = FlightState::landed();
        let mut step = ShowWarningPostStep::new();
        let ctx = StepContext {
            simt: 1.1,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        step.step(&ctx, &mut s);
        assert!(s.notifier.text.contains("Welcome aboard, Commander!"));
        step.step(&ctx, &mut s);
        assert_eq!(s.notifier.text.count("Welcome aboard, Commander!"), 1);
    }

    #[test]
    fn test_startup_reports_missing_pilot() {
        let (mut s, table) = setup();
        s.crew.pilot_aboard = false;
        let mut step = ShowWarningPostStep::new();
        let ctx = StepContext {
            simt: 2.0,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        step.step(&ctx, &mut s);
        assert!(s.notifier.text.contains("NO PILOT ON BOARD!"));
    }

    #[test]
    fn test_mws_blinks_with_beep() {
        let (mut s, table) = setup();
        s.mws.active = true;
        let mut step = ManageMwsPostStep;
        for (simt, lit) in [(10.1, true), (10.6, false), (11.2, true)] {
            let ctx = StepContext {
                simt,
                simdt: 0.1,
                mjd: 0.0,
                subsystems: &table,
            };
            s.sound.update(simt);
            step.step(&ctx, &mut s);
            assert_eq!(s.mws.lit, lit, "simt {}", simt);
        }
        assert_eq!(clip(&s).slot_play_count(SoundSlot::WarningBeep), 2);

        s.mws.active = false;
        let ctx = StepContext {
            simt: 11.3,
            simdt: 0.1,
            mjd: 0.0,
            subsystems: &table,
        };
        step.step(&ctx, &mut s);
        assert!(!s.mws.lit);
    }
}
