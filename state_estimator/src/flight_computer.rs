use log::{debug, info};
use shared_types::*;
use telemetry::{TelemetryError, Words};

use crate::altitude::AltitudeEstimator;
use crate::io::*;
use crate::state_machine::{FlightStateMachine, StateMachineMemory};
use crate::GRAVITY;

/// Failure bits owned by the sensor layer. They are taken from every snapshot;
/// the remaining bits are reported through [FlightComputer::report_failure].
const SENSOR_FAILURES: [Failure; 6] = [
    Failure::AvionicsBayTemperature,
    Failure::EngineBayTemperature,
    Failure::Imu,
    Failure::Barometer,
    Failure::ExternalTemperature,
    Failure::Gps,
];

/// Everything that persists between control-loop iterations.
#[derive(Clone, Debug)]
pub struct FlightComputer {
    estimator: AltitudeEstimator,
    state_machine: FlightStateMachine,
    failures: FailureFlags,
    /// last readings that were not flagged as failed
    last_good: SensorSnapshot,
    record: FlightRecord,
}

impl FlightComputer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            estimator: AltitudeEstimator::new(&settings.estimator),
            state_machine: FlightStateMachine::new(settings.state_machine),
            failures: FailureFlags::empty(),
            last_good: SensorSnapshot::default(),
            record: FlightRecord::default(),
        }
    }

    /// Call once before the first [Self::tick].
    pub fn start<C: Clock>(&mut self, clock: &C) {
        let now = clock.now_millis();
        info!("Flight computer started at {}ms", now);
        self.estimator.set_initial_time(now);
    }

    /// Runs one control cycle.
    pub fn tick<S, U, P>(&mut self, sensors: &mut S, uplink: &mut U, pyro: &mut P) -> &FlightRecord
    where
        S: SensorSource,
        U: CommandSource,
        P: PyroDriver,
    {
        let mut snapshot = sensors.read();
        let time = snapshot.timestamp_millis;

        self.substitute_failed_readings(&mut snapshot);
        for failure in SENSOR_FAILURES {
            self.failures.assign(failure, snapshot.failures.contains(failure));
        }

        if let Some(command) = uplink.poll() {
            // A reset cycle: start over from this sample's time, without
            // feeding the sample into the fresh estimator.
            self.estimator.reset_priors();
            self.estimator.set_initial_time(time);
            self.state_machine.force_transition(command);
        } else {
            self.estimator.estimate(
                &(snapshot.accel / GRAVITY),
                &snapshot.gyro,
                snapshot.baro_altitude,
                time,
            );
            self.state_machine.step(time, &self.estimator.fused(), pyro);
        }

        let phase = self.state_machine.phase();
        let mission_time = if phase >= FlightPhase::PoweredFlight {
            time.wrapping_sub(self.state_machine.memory().launch_start_time)
        } else {
            time
        };

        self.record = FlightRecord {
            phase,
            snapshot,
            estimate: self.estimator.fused(),
            failures: self.failures,
            mission_time,
        };

        &self.record
    }

    /// Replaces readings flagged as failed with the last good ones.
    fn substitute_failed_readings(&mut self, snapshot: &mut SensorSnapshot) {
        let failed = snapshot.failures;
        let last = &self.last_good;

        if failed.contains(Failure::Imu) {
            debug!("IMU read failed, holding previous values");
            snapshot.accel = last.accel;
            snapshot.gyro = last.gyro;
            snapshot.mag = last.mag;
        }
        if failed.contains(Failure::Barometer) {
            debug!("Barometer read failed, holding previous values");
            snapshot.baro_altitude = last.baro_altitude;
            snapshot.baro_temp = last.baro_temp;
        }
        if failed.contains(Failure::ExternalTemperature) {
            snapshot.external_temp = last.external_temp;
        }
        if failed.contains(Failure::AvionicsBayTemperature) {
            snapshot.avbay_temp = last.avbay_temp;
        }
        if failed.contains(Failure::EngineBayTemperature) {
            snapshot.engbay_temp = last.engbay_temp;
        }
        if failed.contains(Failure::Gps) {
            snapshot.gps = last.gps;
        }

        self.last_good = *snapshot;
    }

    /// For failures detected outside the sensor layer (datalog, radio, pyro
    /// continuity).
    pub fn report_failure(&mut self, failure: Failure, active: bool) {
        self.failures.assign(failure, active);
    }

    pub fn current_phase(&self) -> FlightPhase {
        self.state_machine.phase()
    }

    pub fn current_estimate(&self) -> FusedEstimate {
        self.estimator.fused()
    }

    pub fn current_failure_flags(&self) -> u16 {
        self.failures.bits()
    }

    pub fn memory(&self) -> &StateMachineMemory {
        self.state_machine.memory()
    }

    pub fn record(&self) -> &FlightRecord {
        &self.record
    }

    /// Encodes the latest record with the current phase's layout.
    pub fn encode_telemetry(&self) -> Result<Words, TelemetryError> {
        telemetry::encode(self.record.phase, &self.record)
    }
}
