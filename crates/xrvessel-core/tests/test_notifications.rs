//! Integration tests for the warning channel, the startup callout and the MWS.
//!
//! Exercises: show_warning → ShowWarningPostStep pacing against a
//! ClipSound engine where every clip lasts two seconds.

use xrvessel_core::config::builtin_config;
use xrvessel_core::prelude::*;
use xrvessel_core::sound::{files, SoundSlot, SoundType};

const SIMDT: f64 = 0.1;

// ── Helpers ────────────────────────────────────────────────────────────

fn controller(flight: FlightState) -> VesselController {
    let config = builtin_config(VesselType::Xr1).expect("builtin config");
    let mut c = VesselController::with_seed(config, Box::new(ClipSound::new(2.0)), 99);
    c.state_mut().flight = flight;
    c
}

fn clip(c: &VesselController) -> &ClipSound {
    c.state()
        .sound
        .as_any()
        .downcast_ref::<ClipSound>()
        .expect("clip sound engine")
}

/// Simulation times at which `file` started on the warning slot.
fn warning_starts(c: &VesselController, file: &str) -> Vec<f64> {
    clip(c)
        .played()
        .iter()
        .filter(|p| p.slot == SoundSlot::Warning && p.file.as_deref() == Some(file))
        .map(|p| p.simt)
        .collect()
}

fn nag(c: &mut VesselController, file: &str, force: bool) {
    c.state_mut()
        .show_warning(Some(file), SoundType::WarningCallout, "Test warning.", force);
}

// ── Repeat suppression ─────────────────────────────────────────────────

#[test]
fn repeated_warning_waits_three_seconds_after_it_ends() {
    let mut c = controller(FlightState::in_orbit(300e3));
    for k in 1..=70 {
        nag(&mut c, files::DOOR_OPEN, false);
        c.update(k as f64 * SIMDT, SIMDT, 0.0);
    }

    let starts = warning_starts(&c, files::DOOR_OPEN);
    assert!(starts.len() >= 2, "played {:?}", starts);
    assert!((starts[0] - 0.1).abs() < 1e-9);
    // clip ends at 2.1, then three seconds of silence
    assert!(starts[1] > 5.1 - 1e-9, "second play at {}", starts[1]);
    assert!(starts[1] < 5.5, "second play at {}", starts[1]);
}

#[test]
fn different_warning_plays_as_soon_as_the_channel_is_free() {
    let mut c = controller(FlightState::in_orbit(300e3));
    nag(&mut c, files::DOOR_OPEN, false);
    c.update(0.1, SIMDT, 0.0);
    for k in 2..=30 {
        nag(&mut c, files::WING_STRESS, false);
        c.update(k as f64 * SIMDT, SIMDT, 0.0);
    }
    let starts = warning_starts(&c, files::WING_STRESS);
    assert_eq!(starts.len(), 1);
    assert!(starts[0] >= 2.1 - 1e-9 && starts[0] <= 2.3, "played at {}", starts[0]);
}

#[test]
fn forced_warning_is_never_deferred() {
    let mut c = controller(FlightState::in_orbit(300e3));
    nag(&mut c, files::DOOR_OPEN, false);
    c.update(0.1, SIMDT, 0.0);

    // interrupts a callout in progress
    nag(&mut c, files::HEAT_DAMAGE, true);
    c.update(0.2, SIMDT, 0.0);
    assert_eq!(warning_starts(&c, files::HEAT_DAMAGE), vec![0.2]);

    // and ignores the repeat cooldown
    nag(&mut c, files::HEAT_DAMAGE, true);
    c.update(0.3, SIMDT, 0.0);
    assert_eq!(warning_starts(&c, files::HEAT_DAMAGE).len(), 2);
}

// ── Startup callout ────────────────────────────────────────────────────

#[test]
fn landed_vessel_is_welcomed_once() {
    let mut c = controller(FlightState::landed());
    for k in 0..40 {
        c.update(k as f64 * SIMDT, SIMDT, 0.0);
    }
    let text = &c.state().notifier.text;
    assert_eq!(text.count("Welcome aboard, Commander!"), 1);
    assert_eq!(clip(&c).play_count(files::WELCOME_ABOARD), 1);
}

#[test]
fn startup_reports_the_crew_first() {
    let mut c = controller(FlightState::in_orbit(300e3));
    c.state_mut().crew.kill();
    c.state_mut().airframe.left_wing = 0.5;
    for k in 0..20 {
        c.update(k as f64 * SIMDT, SIMDT, 0.0);
    }
    let text = &c.state().notifier.text;
    assert!(text.contains("CREW IS DEAD!"));
    assert!(!text.contains("Ship damage detected!"));
}

#[test]
fn startup_flags_damage_on_the_mws() {
    let mut c = controller(FlightState::in_orbit(300e3));
    c.state_mut().airframe.right_wing = 0.4;
    for k in 0..15 {
        c.update(k as f64 * SIMDT, SIMDT, 0.0);
    }
    assert!(c.state().notifier.text.contains("Ship damage detected!"));
    assert!(c.state().mws.active);
}

// ── MWS ────────────────────────────────────────────────────────────────

#[test]
fn mws_blinks_and_beeps_on_each_lit_edge() {
    let mut c = controller(FlightState::in_orbit(300e3));
    // a missing pilot keeps a warning present
    c.state_mut().crew.pilot_aboard = false;
    c.state_mut().mws.active = true;

    let mut lit = Vec::new();
    for k in 0..=12 {
        let simt = 10.0 + k as f64 * 0.25;
        c.update(simt, 0.25, 0.0);
        lit.push(c.state().mws.lit);
    }
    assert_eq!(&lit[..4], &[true, true, false, false]);
    assert_eq!(clip(&c).slot_play_count(SoundSlot::WarningBeep), 4);
}

#[test]
fn mws_resets_without_a_warning() {
    let mut c = controller(FlightState::in_orbit(300e3));
    c.state_mut().mws.active = true;
    c.update(10.0, SIMDT, 0.0);
    assert!(!c.state().mws.active);
    assert!(!c.state().mws.lit);
}
