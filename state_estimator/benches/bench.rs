use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use nalgebra::Vector3;
use shared_types::{EstimatorSettings, FlightPhase, FlightRecord, GroundCommand, SensorSnapshot, Settings};
use state_estimator::{AltitudeEstimator, FlightComputer, NoUplink, PyroDriver, SensorSource};

use FlightPhase::*;

struct Mocked(u32);

impl SensorSource for Mocked {
    fn read(&mut self) -> SensorSnapshot {
        self.0 = self.0.wrapping_add(10);
        SensorSnapshot {
            accel: Vector3::new(0.6, -3.1, 9.9),
            gyro: Vector3::new(0.1, -0.5, 0.3),
            mag: Vector3::new(50.0, -0.5, 0.1),
            baro_altitude: 123.4,
            external_temp: 21.5,
            timestamp_millis: self.0,
            ..Default::default()
        }
    }
}

struct NoPyro;

impl PyroDriver for NoPyro {
    fn fire(&mut self, _channel: shared_types::PyroChannel) {}
}

fn estimate(c: &mut Criterion) {
    let mut estimator = AltitudeEstimator::new(&EstimatorSettings::default());
    estimator.set_initial_time(0);

    let mut t: u32 = 0;
    c.bench_function("estimate", |b| {
        b.iter_batched(
            || {
                t = t.wrapping_add(10);
                (Vector3::new(0.06, -0.3, 1.01), Vector3::new(0.1, -0.5, 0.3), t)
            },
            |(accel, gyro, t)| estimator.estimate(&accel, &gyro, 123.4, t),
            BatchSize::SmallInput,
        )
    });
}

fn tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for command in [GroundCommand::PowerOn, GroundCommand::LaunchReady] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", command)), &command, |b, command| {
            let mut computer = FlightComputer::new(&Settings::default());
            let mut sensors = Mocked(0);
            computer.tick(&mut sensors, &mut Some(*command), &mut NoPyro);

            b.iter(|| *computer.tick(&mut sensors, &mut NoUplink, &mut NoPyro));
        });
    }
}

fn encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for phase in [PowerOn, LaunchReady, Coast, Recovery] {
        group.bench_with_input(BenchmarkId::from_parameter(phase.label()), &phase, |b, phase| {
            let record = FlightRecord {
                phase: *phase,
                snapshot: Mocked(0).read(),
                ..Default::default()
            };
            b.iter(|| telemetry::encode(*phase, &record))
        });
    }
}

criterion_group!(benches, estimate, tick, encode);
criterion_main!(benches);
