//! Integration tests for door interlocks, cascades and the centering modes.
//!
//! Exercises: activate → Subsystem::on_activate → cascades, with the
//! refusal text the pilot sees, plus AutoCenteringPostStep.

use xrvessel_core::config::builtin_config;
use xrvessel_core::prelude::*;
use xrvessel_core::sound::{files, SoundSlot};

const SIMDT: f64 = 0.1;

// ── Helpers ────────────────────────────────────────────────────────────

/// APU online, doors settled.
fn controller(vessel_type: VesselType, flight: FlightState) -> VesselController {
    let config = builtin_config(vessel_type).expect("builtin config");
    let mut c = VesselController::with_seed(config, Box::new(ClipSound::new(2.0)), 71);
    c.state_mut().flight = flight;
    c.state_mut().apu.status = DoorStatus::Open;
    c.update(0.0, SIMDT, 0.0);
    c
}

fn refused(c: &mut VesselController, id: DoorId, target: DoorStatus) -> bool {
    c.activate(id, target) == Ok(ActivationOutcome::Rejected(Rejection::Interlock))
}

fn shows(c: &VesselController, line: &str) -> bool {
    c.state().notifier.text.contains(line)
}

fn clip(c: &VesselController) -> &ClipSound {
    c.state()
        .sound
        .as_any()
        .downcast_ref::<ClipSound>()
        .expect("clip sound engine")
}

// ── Gear ───────────────────────────────────────────────────────────────

#[test]
fn landed_gear_cannot_be_raised() {
    let mut c = controller(VesselType::Xr1, FlightState::landed());
    c.force_activate(DoorId::LandingGear, DoorStatus::Open).expect("gear");
    assert!(refused(&mut c, DoorId::LandingGear, DoorStatus::Closed));
    assert!(shows(&c, "Ship is landed: cannot raise landing gear."));
    assert_eq!(c.state().door_status(DoorId::LandingGear), DoorStatus::Open);
}

#[test]
fn gear_needs_altitude_to_lower() {
    let mut c = controller(
        VesselType::Xr1,
        FlightState {
            altitude: 1.0,
            ..FlightState::in_orbit(0.0)
        },
    );
    assert!(refused(&mut c, DoorId::LandingGear, DoorStatus::Open));
    assert!(shows(&c, "Insufficient altitude to lower"));
}

// ── Hatch ──────────────────────────────────────────────────────────────

#[test]
fn hatch_locked_in_vacuum_unless_overridden() {
    let mut c = controller(VesselType::Xr1, FlightState::in_orbit(300e3));
    assert!(refused(&mut c, DoorId::Hatch, DoorStatus::Open));
    assert!(shows(&c, "WARNING: Crew Hatch LOCKED"));

    c.state_mut().interlocks.crew_hatch = true;
    assert_eq!(
        c.activate(DoorId::Hatch, DoorStatus::Open),
        Ok(ActivationOutcome::Started)
    );
}

#[test]
fn hatch_opens_freely_in_atmosphere() {
    let mut c = controller(VesselType::Xr2, FlightState::landed());
    assert_eq!(
        c.activate(DoorId::Hatch, DoorStatus::Open),
        Ok(ActivationOutcome::Started)
    );
}

// ── Nosecone and airlock ───────────────────────────────────────────────

#[test]
fn outer_door_stays_shut_behind_the_nosecone() {
    let mut c = controller(VesselType::Xr1, FlightState::landed());
    assert!(refused(&mut c, DoorId::OuterAirlock, DoorStatus::Open));
    assert!(shows(&c, "cannot open outer door"));
    c.update(0.1, SIMDT, 0.0);
    assert_eq!(clip(&c).play_count(files::OUTER_DOOR_LOCKED), 1);
}

#[test]
fn closing_the_nosecone_closes_outer_door_and_ladder() {
    let mut c = controller(VesselType::Xr1, FlightState::landed());
    c.force_activate(DoorId::Nosecone, DoorStatus::Open).expect("nosecone");
    c.force_activate(DoorId::OuterAirlock, DoorStatus::Open).expect("outer");
    c.force_activate(DoorId::Ladder, DoorStatus::Open).expect("ladder");

    assert_eq!(
        c.activate(DoorId::Nosecone, DoorStatus::Closed),
        Ok(ActivationOutcome::Started)
    );
    let s = c.state();
    assert_eq!(s.door_status(DoorId::Nosecone), DoorStatus::Closing);
    assert_eq!(s.door_status(DoorId::OuterAirlock), DoorStatus::Closing);
    assert_eq!(s.door_status(DoorId::Ladder), DoorStatus::Closing);
}

#[test]
fn docked_nosecone_stays_open() {
    let mut c = controller(VesselType::Xr5, FlightState::in_orbit(300e3));
    c.force_activate(DoorId::Nosecone, DoorStatus::Open).expect("nosecone");
    c.state_mut().flight.docked = true;
    assert!(refused(&mut c, DoorId::Nosecone, DoorStatus::Closed));
    assert!(shows(&c, "ship is docked!"));
}

#[test]
fn ladder_needs_the_nosecone_open() {
    let mut c = controller(VesselType::Xr1, FlightState::landed());
    assert!(refused(&mut c, DoorId::Ladder, DoorStatus::Open));
    assert!(shows(&c, "Cannot deploy ladder while"));
}

#[test]
fn outer_door_in_vacuum_vents_the_chamber() {
    let mut c = controller(VesselType::Xr1, FlightState::in_orbit(300e3));
    c.force_activate(DoorId::Nosecone, DoorStatus::Open).expect("nosecone");

    // pressurized chamber against vacuum
    assert!(refused(&mut c, DoorId::OuterAirlock, DoorStatus::Open));
    assert!(shows(&c, "WARNING: Chamber pressure exceeds"));

    c.force_activate(DoorId::AirlockChamber, DoorStatus::Open).expect("chamber");
    assert_eq!(
        c.activate(DoorId::OuterAirlock, DoorStatus::Open),
        Ok(ActivationOutcome::Started)
    );
    assert_eq!(c.state().door_status(DoorId::AirlockChamber), DoorStatus::Open);
}

#[test]
fn override_opens_outer_door_against_the_pressure() {
    let mut c = controller(VesselType::Xr1, FlightState::in_orbit(300e3));
    c.force_activate(DoorId::Nosecone, DoorStatus::Open).expect("nosecone");
    c.state_mut().interlocks.airlock = true;
    assert_eq!(
        c.activate(DoorId::OuterAirlock, DoorStatus::Open),
        Ok(ActivationOutcome::Started)
    );
    // the chamber follows the side the door opens onto
    assert_eq!(c.state().door_status(DoorId::AirlockChamber), DoorStatus::Open);
    assert_eq!(c.state().door_proc(DoorId::AirlockChamber), 1.0);
}

#[test]
fn chamber_in_flux_locks_the_outer_door() {
    let mut c = controller(VesselType::Xr1, FlightState::landed());
    c.force_activate(DoorId::Nosecone, DoorStatus::Open).expect("nosecone");
    c.activate(DoorId::AirlockChamber, DoorStatus::Open).expect("chamber");
    assert!(refused(&mut c, DoorId::OuterAirlock, DoorStatus::Open));
    assert!(shows(&c, "in flux; outer door is LOCKED."));
}

#[test]
fn inner_door_needs_a_pressurized_chamber() {
    let mut c = controller(VesselType::Xr1, FlightState::in_orbit(300e3));
    c.force_activate(DoorId::AirlockChamber, DoorStatus::Open).expect("chamber");
    assert!(refused(&mut c, DoorId::InnerAirlock, DoorStatus::Open));
    assert!(shows(&c, "unpressurized; inner door is LOCKED."));

    c.force_activate(DoorId::AirlockChamber, DoorStatus::Closed).expect("chamber");
    assert_eq!(
        c.activate(DoorId::InnerAirlock, DoorStatus::Open),
        Ok(ActivationOutcome::Started)
    );
}

#[test]
fn chamber_refuses_while_a_door_is_open() {
    let mut c = controller(VesselType::Xr1, FlightState::landed());
    c.force_activate(DoorId::InnerAirlock, DoorStatus::Open).expect("inner");
    let beeps_before = clip(&c).slot_play_count(SoundSlot::Error1);
    assert!(refused(&mut c, DoorId::AirlockChamber, DoorStatus::Open));
    assert!(shows(&c, "Inner airlock door is open."));
    // quiet refusal
    assert_eq!(clip(&c).slot_play_count(SoundSlot::Error1), beeps_before);
}

// ── Engine doors ───────────────────────────────────────────────────────

#[test]
fn engine_doors_gate_their_engines() {
    let mut c = controller(VesselType::Xr2, FlightState::in_orbit(300e3));
    assert!(!c.state().engines.hover);
    c.force_activate(DoorId::HoverDoors, DoorStatus::Open).expect("hover doors");
    c.update(0.1, SIMDT, 0.0);
    assert!(c.state().engines.hover);
    assert!(!c.state().engines.scram);

    c.activate(DoorId::HoverDoors, DoorStatus::Closed).expect("hover doors");
    c.update(0.2, SIMDT, 0.0);
    assert!(!c.state().engines.hover);
}

// ── Centering ──────────────────────────────────────────────────────────

#[test]
fn center_of_lift_recenters_at_the_shift_rate() {
    let mut c = controller(VesselType::Xr2, FlightState::in_orbit(300e3));
    c.state_mut().centering.center_of_lift = 2.0;
    c.state_mut().centering.cog_center_mode = true;

    c.update(1.0, 1.0, 0.0);
    let col = c.state().centering.center_of_lift;
    assert!((col - (2.0 - 1.1644)).abs() < 1e-9, "{}", col);

    c.update(2.0, 1.0, 0.0);
    assert_eq!(c.state().centering.center_of_lift, 0.0);
    assert!(!c.state().centering.cog_center_mode);
}

#[test]
fn centering_stops_without_hydraulics() {
    let mut c = controller(VesselType::Xr2, FlightState::in_orbit(300e3));
    c.state_mut().apu.status = DoorStatus::Closed;
    c.state_mut().centering.scram_gimbal = [0.1, -0.1];
    c.state_mut().centering.scram_center_mode = true;
    c.update(0.1, SIMDT, 0.0);
    assert!(!c.state().centering.scram_center_mode);
    assert_eq!(c.state().centering.scram_gimbal, [0.1, -0.1]);
    assert!(shows(&c, "WARNING: APU is offline; no hydraulic"));
}
