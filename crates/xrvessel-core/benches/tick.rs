//! Full-tick throughput: pre-steps, post-steps and the door machinery.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use xrvessel_core::prelude::*;

const SIMDT: f64 = 1.0 / 60.0;

fn busy_vessel(vessel_type: VesselType) -> VesselController {
    let mut c = VesselController::for_type(vessel_type).expect("built-in config");
    {
        let s = c.state_mut();
        s.flight = FlightState {
            altitude: 12e3,
            airspeed: 900.0,
            static_pressure: 20e3,
            dynamic_pressure: 8e3,
            ..Default::default()
        };
        s.apu.status = DoorStatus::Open;
    }
    c.update(0.0, SIMDT, 51544.5);
    for id in c.state().fitted_doors() {
        let _ = c.toggle(id);
    }
    c
}

fn bench_tick(c: &mut Criterion) {
    for vessel_type in VesselType::all() {
        let mut vessel = busy_vessel(*vessel_type);
        let mut simt = 0.0;
        c.bench_function(&format!("tick_{}", vessel_type.name()), |b| {
            b.iter(|| {
                simt += SIMDT;
                vessel.update(black_box(simt), SIMDT, 51544.5);
            })
        });
    }
}

fn bench_scenario_save(c: &mut Criterion) {
    let vessel = busy_vessel(VesselType::Xr5);
    c.bench_function("save_scenario_xr5", |b| {
        b.iter_batched(
            || Vec::with_capacity(4096),
            |mut out| {
                vessel.save_scenario(&mut out).expect("write scenario");
                out
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick, bench_scenario_save);
criterion_main!(benches);
