//! Feeds a recorded sensor log through the flight computer, as if the rows
//! arrived from the hardware one cycle at a time.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use shared_types::*;
use state_estimator::{Clock, FlightComputer, NoUplink, PyroDriver, SensorSource};

/// One line of a sensor log. Accelerations are in m/s², angular rates in
/// deg/s, the barometric altitude in m. Other columns are ignored.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SensorRow {
    pub time: u32,
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
    pub temp: f32,
    pub mx: f32,
    pub my: f32,
    pub mz: f32,
    pub bmp_temp: f32,
    pub altitude: f32,
}

impl From<SensorRow> for SensorSnapshot {
    fn from(row: SensorRow) -> Self {
        Self {
            accel: Vector3::new(row.ax, row.ay, row.az),
            gyro: Vector3::new(row.gx, row.gy, row.gz),
            mag: Vector3::new(row.mx, row.my, row.mz),
            baro_altitude: row.altitude,
            baro_temp: row.bmp_temp,
            // the IMU sits in the avionics bay
            avbay_temp: row.temp,
            timestamp_millis: row.time,
            ..Default::default()
        }
    }
}

/// A [SensorSource] backed by a sensor log. Once the log is exhausted the
/// last row is repeated.
#[derive(Debug, Default)]
pub struct ReplaySensors {
    rows: VecDeque<SensorSnapshot>,
    last: SensorSnapshot,
}

impl ReplaySensors {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let rows = reader
            .deserialize::<SensorRow>()
            .map(|row| row.map(SensorSnapshot::from))
            .collect::<Result<VecDeque<_>, _>>()?;

        Ok(Self { rows, last: SensorSnapshot::default() })
    }

    pub fn open(path: &Path) -> Result<Self, csv::Error> {
        Self::from_reader(File::open(path)?)
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SensorSource for ReplaySensors {
    fn read(&mut self) -> SensorSnapshot {
        if let Some(snapshot) = self.rows.pop_front() {
            self.last = snapshot;
        }

        self.last
    }
}

/// The log's own timestamps are the clock.
impl Clock for ReplaySensors {
    fn now_millis(&self) -> u32 {
        self.rows.front().unwrap_or(&self.last).timestamp_millis
    }
}

/// Stands in for the pyro channels; only records what would have fired.
#[derive(Debug, Default)]
pub struct LoggingPyro {
    pub fired: Vec<PyroChannel>,
}

impl PyroDriver for LoggingPyro {
    fn fire(&mut self, channel: PyroChannel) {
        info!("Firing {:?} charge", channel);
        self.fired.push(channel);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub time: u32,
    pub from: FlightPhase,
    pub to: FlightPhase,
    pub altitude: f32,
}

#[derive(Clone, Debug, Default)]
pub struct ReplaySummary {
    pub cycles: usize,
    pub transitions: Vec<Transition>,
    pub fired: Vec<PyroChannel>,
    pub final_phase: FlightPhase,
}

/// Runs every row of `sensors` through a fresh flight computer, handing each
/// cycle's record to `on_record`.
pub fn replay<F>(
    settings: &Settings,
    sensors: &mut ReplaySensors,
    mut on_record: F,
) -> Result<ReplaySummary, Box<dyn std::error::Error>>
where
    F: FnMut(&FlightRecord) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut computer = FlightComputer::new(settings);
    let mut pyro = LoggingPyro::default();
    let mut summary = ReplaySummary::default();

    computer.start(&*sensors);
    let mut phase = computer.current_phase();

    while !sensors.is_empty() {
        let record = *computer.tick(sensors, &mut NoUplink, &mut pyro);
        summary.cycles += 1;

        if record.phase != phase {
            summary.transitions.push(Transition {
                time: record.snapshot.timestamp_millis,
                from: phase,
                to: record.phase,
                altitude: record.estimate.altitude,
            });
            phase = record.phase;
        }

        on_record(&record)?;
    }

    debug!("Replayed {} cycles", summary.cycles);
    summary.fired = pyro.fired;
    summary.final_phase = phase;
    Ok(summary)
}

#[derive(Debug, Serialize)]
struct EstimateRow {
    #[serde(rename = "Time (ms)")]
    time: u32,
    #[serde(rename = "Altitude")]
    altitude: f32,
    #[serde(rename = "Vertical Velocity")]
    vertical_velocity: f32,
    #[serde(rename = "Vertical Acceleration")]
    vertical_acceleration: f32,
    #[serde(rename = "State")]
    state: u8,
}

/// Writes one CSV line of estimator output per record.
pub struct EstimateWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> EstimateWriter<W> {
    pub fn new(output: W) -> Self {
        Self { writer: csv::Writer::from_writer(output) }
    }

    pub fn write(&mut self, record: &FlightRecord) -> Result<(), csv::Error> {
        self.writer.serialize(EstimateRow {
            time: record.snapshot.timestamp_millis,
            altitude: record.estimate.altitude,
            vertical_velocity: record.estimate.vertical_velocity,
            vertical_acceleration: record.estimate.vertical_acceleration,
            state: record.phase as u8,
        })
    }

    pub fn into_inner(self) -> Result<W, Box<dyn std::error::Error>> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "time,ax,ay,az,gx,gy,gz,temp,mx,my,mz,bmp_temp,pressure,altitude\n";

    /// Two seconds on the pad, then a 4g burn.
    fn launch_log() -> String {
        let mut log = HEADER.to_string();
        for i in 1..=400u32 {
            let time = i * 10;
            let (az, altitude) = match time {
                0..=1999 => (9.81, 0.0),
                _ => {
                    let tau = (time - 2000) as f32 / 1000.0;
                    (49.81, 20.0 * tau * tau)
                }
            };
            log += &format!("{time},0.0,0.0,{az},0.0,0.0,0.0,24.5,0.1,0.2,0.3,23.0,1013.25,{altitude}\n");
        }
        log
    }

    #[test]
    fn should_parse_rows() {
        let log = format!("{HEADER}1500, 0.1, -0.2, 9.8, 1.0, 2.0, 3.0, 24.5, 0.1, 0.2, 0.3, 23.0, 1013.25, 12.5\n");
        let mut sensors = ReplaySensors::from_reader(log.as_bytes()).unwrap();

        assert_eq!(sensors.remaining(), 1);
        assert_eq!(sensors.now_millis(), 1500);

        let snapshot = sensors.read();
        assert_eq!(snapshot.timestamp_millis, 1500);
        assert_eq!(snapshot.accel, Vector3::new(0.1, -0.2, 9.8));
        assert_eq!(snapshot.gyro, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(snapshot.baro_altitude, 12.5);
        assert_eq!(snapshot.baro_temp, 23.0);
        assert!(snapshot.failures.is_empty());

        assert!(sensors.is_empty());
        assert_eq!(sensors.read(), snapshot);
    }

    #[test]
    fn should_reject_malformed_rows() {
        let log = format!("{HEADER}10,0.0,0.0,abc,0.0,0.0,0.0,24.5,0.1,0.2,0.3,23.0,1013.25,0.0\n");
        assert!(ReplaySensors::from_reader(log.as_bytes()).is_err());
    }

    #[test]
    fn should_detect_launch_in_replay() {
        let log = launch_log();
        let mut sensors = ReplaySensors::from_reader(log.as_bytes()).unwrap();

        let mut records = 0;
        let summary = replay(&Settings::default(), &mut sensors, |_| {
            records += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(summary.cycles, 400);
        assert_eq!(records, 400);
        assert_eq!(summary.final_phase, FlightPhase::PoweredFlight);
        assert_eq!(summary.transitions.len(), 1);

        let launch = summary.transitions[0];
        assert_eq!(launch.from, FlightPhase::PowerOn);
        assert!((2000..2100).contains(&launch.time), "{}", launch.time);
        assert!(summary.fired.is_empty());
    }

    #[test]
    fn should_write_estimates_as_csv() {
        let record = FlightRecord {
            phase: FlightPhase::Coast,
            snapshot: SensorSnapshot { timestamp_millis: 1234, ..Default::default() },
            estimate: FusedEstimate { altitude: 100.5, vertical_velocity: 12.0, vertical_acceleration: -9.75 },
            ..Default::default()
        };

        let mut writer = EstimateWriter::new(Vec::new());
        writer.write(&record).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            output,
            "Time (ms),Altitude,Vertical Velocity,Vertical Acceleration,State\n1234,100.5,12.0,-9.75,4\n"
        );
    }
}
