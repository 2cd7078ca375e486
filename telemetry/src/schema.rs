use shared_types::FlightPhase;

use crate::bitpack::{MAX_FIELDS, MAX_WORDS, WORD_BITS};
use crate::*;

/// Ordered list of fields making up one telemetry message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MessageDefinition(pub &'static [(Field, Representation)]);

/// One message layout per flight phase. Decoding has no length information
/// other than the phase, so any change to a layout needs a new revision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetrySchema {
    pub revision: u8,
    pub power_on: MessageDefinition,
    pub launch_ready: MessageDefinition,
    pub in_flight: MessageDefinition,
    pub recovery: MessageDefinition,
}

impl MessageDefinition {
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all field widths, without padding at the end of words.
    pub const fn bits(&self) -> u32 {
        let mut bits = 0;
        let mut i = 0;
        while i < self.0.len() {
            bits += self.0[i].1.bits();
            i += 1;
        }
        bits
    }

    pub const fn word_count(&self) -> usize {
        let mut words = 0;
        let mut lsb = 0;
        let mut i = 0;
        while i < self.0.len() {
            let bits = self.0[i].1.bits();
            if bits > lsb {
                words += 1;
                lsb = WORD_BITS;
            }
            lsb -= bits;
            i += 1;
        }
        words
    }

    /// Rejects layouts the packer cannot handle. Used in `const` context, so a
    /// bad table is a compile error.
    pub const fn validate(&self) {
        assert!(!self.is_empty(), "empty message");
        assert!(self.len() <= MAX_FIELDS, "too many fields");
        assert!(matches!(self.0[0].0, Field::FlightPhase), "messages start with the flight phase");
        assert!(self.0[0].1.bits() == PHASE_BITS, "phase field must be 4 bits");

        let mut i = 0;
        while i < self.0.len() {
            let bits = self.0[i].1.bits();
            assert!(bits > 0 && bits <= WORD_BITS, "field width outside 1..=64");
            i += 1;
        }

        assert!(self.word_count() <= MAX_WORDS, "message exceeds word buffer");
    }

    pub fn collect<S: FieldSource>(&self, source: &S) -> Result<Words, TelemetryError> {
        let mut writer = WordWriter::default();
        for (field, repr) in self.0 {
            writer.write(repr.bits(), repr.encode(source.field_value(*field)))?;
        }

        writer.finish()
    }

    /// Calls `cb` with every field in `words`. The caller is responsible for
    /// checking the word count first.
    pub fn read<F: FnMut(Field, FieldValue)>(&self, words: &[u64], mut cb: F) -> Result<(), TelemetryError> {
        let mut reader = WordReader::new(words);
        for (field, repr) in self.0 {
            let code = reader.read(repr.bits())?;
            cb(*field, repr.decode(code));
        }

        Ok(())
    }
}

impl TelemetrySchema {
    pub const fn message(&self, phase: FlightPhase) -> &MessageDefinition {
        match phase {
            FlightPhase::PowerOn => &self.power_on,
            FlightPhase::LaunchReady => &self.launch_ready,
            FlightPhase::PoweredFlight
            | FlightPhase::Burnout
            | FlightPhase::Coast
            | FlightPhase::Apogee
            | FlightPhase::DrogueDeployed
            | FlightPhase::MainDeployAttempt
            | FlightPhase::MainDeployed => &self.in_flight,
            FlightPhase::Recovery => &self.recovery,
        }
    }
}

impl Default for &'static TelemetrySchema {
    fn default() -> Self {
        &DOWNLINK_SCHEMA
    }
}

pub const PHASE_BITS: u32 = 4;
pub const COORDINATE_SCALE: f32 = 1_000_000.0;

pub const PHASE: Representation = Representation::unsigned(PHASE_BITS);
pub const EXTERNAL_TEMPERATURE: Representation = Representation::quantized(11, -15.0..=125.0, 0.0683927699072);
pub const BAY_TEMPERATURE: Representation = Representation::quantized(11, 0.0..=127.0, 0.0620420127015);
pub const ALTITUDE: Representation = Representation::quantized(15, 0.0..=3275.0, 0.0999481185339);
pub const VERTICAL_VELOCITY: Representation = Representation::quantized(15, -50.0..=350.0, 0.0122074037904);
pub const ACCELERATION_XY: Representation = Representation::quantized(9, 0.0..=25.0, 0.0489236790607);
pub const ACCELERATION_Z: Representation = Representation::quantized(11, -30.0..=100.0, 0.0635075720567);
pub const MAGNETIC_FLUX: Representation = Representation::quantized(11, -5.0..=5.0, 0.0195694716243);
pub const ANGULAR_VELOCITY_XY: Representation = Representation::quantized(20, -1440.0..=1440.0, 0.0027465846506);
pub const ANGULAR_VELOCITY_Z: Representation = Representation::quantized(17, -360.0..=360.0, 0.00549320597234);
pub const GPS_SPEED: Representation = Representation::quantized(10, 0.0..=70.0, 0.0999481185339);
pub const LONGITUDE: Representation = Representation::magnitude(28, COORDINATE_SCALE);
pub const LATITUDE: Representation = Representation::magnitude(27, COORDINATE_SCALE);
pub const FAILURE_FLAGS: Representation = Representation::unsigned(shared_types::FailureFlags::USED_BITS);
pub const MISSION_TIME: Representation = Representation::unsigned(19);

pub const TELEMETRY_POWER_ON: MessageDefinition = MessageDefinition(&[
    (Field::FlightPhase, PHASE),
    (Field::ExternalTemperature, EXTERNAL_TEMPERATURE),
    (Field::EngineBayTemperature, BAY_TEMPERATURE),
    (Field::AvionicsBayTemperature, BAY_TEMPERATURE),
    (Field::GpsQuality, Representation::unsigned(2)),
    (Field::GpsFix, Representation::unsigned(1)),
    (Field::GpsSatellites, Representation::unsigned(3)),
    (Field::GpsAntennaStatus, Representation::unsigned(2)),
    (Field::FailureFlags, FAILURE_FLAGS),
]);

pub const TELEMETRY_LAUNCH_READY: MessageDefinition = MessageDefinition(&[
    (Field::FlightPhase, PHASE),
    (Field::GpsSatellites, Representation::unsigned(3)),
    (Field::LongitudeSign, Representation::Sign),
    (Field::Longitude, LONGITUDE),
    (Field::LatitudeSign, Representation::Sign),
    (Field::Latitude, LATITUDE),
    // word 2
    (Field::AngularVelocity(Dim::X), ANGULAR_VELOCITY_XY),
    (Field::Acceleration(Dim::Y), ACCELERATION_XY),
    (Field::AngularVelocity(Dim::Y), ANGULAR_VELOCITY_XY),
    (Field::VerticalVelocity, VERTICAL_VELOCITY),
    // word 3
    (Field::AngularVelocity(Dim::Z), ANGULAR_VELOCITY_Z),
    (Field::Acceleration(Dim::X), ACCELERATION_XY),
    (Field::Altitude, ALTITUDE),
    (Field::GpsFix, Representation::unsigned(1)),
    (Field::ExternalTemperature, EXTERNAL_TEMPERATURE),
    (Field::AvionicsBayTemperature, BAY_TEMPERATURE),
    // word 4
    (Field::Acceleration(Dim::Z), ACCELERATION_Z),
    (Field::MagneticFluxDensity(Dim::X), MAGNETIC_FLUX),
    (Field::MagneticFluxDensity(Dim::Y), MAGNETIC_FLUX),
    (Field::MagneticFluxDensity(Dim::Z), MAGNETIC_FLUX),
    (Field::FailureFlags, FAILURE_FLAGS),
    (Field::GpsSpeed, GPS_SPEED),
    // word 5
    (Field::GpsAltitude, ALTITUDE),
    (Field::GpsQuality, Representation::unsigned(2)),
    (Field::EngineBayTemperature, BAY_TEMPERATURE),
    (Field::GpsAntennaStatus, Representation::unsigned(2)),
]);

pub const TELEMETRY_IN_FLIGHT: MessageDefinition = MessageDefinition(&[
    (Field::FlightPhase, PHASE),
    (Field::GpsSatellites, Representation::unsigned(3)),
    (Field::LongitudeSign, Representation::Sign),
    (Field::Longitude, LONGITUDE),
    (Field::LatitudeSign, Representation::Sign),
    (Field::Latitude, LATITUDE),
    // word 2
    (Field::AngularVelocity(Dim::X), ANGULAR_VELOCITY_XY),
    (Field::GpsAltitude, ALTITUDE),
    (Field::Acceleration(Dim::X), ACCELERATION_XY),
    (Field::AngularVelocity(Dim::Y), ANGULAR_VELOCITY_XY),
    // word 3
    (Field::MissionTime, MISSION_TIME),
    (Field::AngularVelocity(Dim::Z), ANGULAR_VELOCITY_Z),
    (Field::Altitude, ALTITUDE),
    (Field::GpsAntennaStatus, Representation::unsigned(2)),
    (Field::ExternalTemperature, EXTERNAL_TEMPERATURE),
    // word 4
    (Field::Acceleration(Dim::Y), ACCELERATION_XY),
    (Field::AvionicsBayTemperature, BAY_TEMPERATURE),
    (Field::EngineBayTemperature, BAY_TEMPERATURE),
    (Field::Acceleration(Dim::Z), ACCELERATION_Z),
    (Field::MagneticFluxDensity(Dim::X), MAGNETIC_FLUX),
    (Field::MagneticFluxDensity(Dim::Y), MAGNETIC_FLUX),
    // word 5
    (Field::MagneticFluxDensity(Dim::Z), MAGNETIC_FLUX),
    (Field::FailureFlags, FAILURE_FLAGS),
    (Field::GpsSpeed, GPS_SPEED),
    (Field::VerticalVelocity, VERTICAL_VELOCITY),
    (Field::GpsQuality, Representation::unsigned(2)),
    (Field::GpsFix, Representation::unsigned(1)),
]);

pub const TELEMETRY_RECOVERY: MessageDefinition = MessageDefinition(&[
    (Field::FlightPhase, PHASE),
    (Field::GpsSatellites, Representation::unsigned(3)),
    (Field::LongitudeSign, Representation::Sign),
    (Field::Longitude, LONGITUDE),
    (Field::LatitudeSign, Representation::Sign),
    (Field::Latitude, LATITUDE),
    // word 2
    (Field::ExternalTemperature, EXTERNAL_TEMPERATURE),
    (Field::EngineBayTemperature, BAY_TEMPERATURE),
    (Field::AvionicsBayTemperature, BAY_TEMPERATURE),
    (Field::GpsFix, Representation::unsigned(1)),
    (Field::FailureFlags, FAILURE_FLAGS),
    (Field::GpsQuality, Representation::unsigned(2)),
    (Field::GpsAntennaStatus, Representation::unsigned(2)),
]);

pub const PROTOCOL_REVISION: u8 = 1;

pub static DOWNLINK_SCHEMA: TelemetrySchema = TelemetrySchema {
    revision: PROTOCOL_REVISION,
    power_on: TELEMETRY_POWER_ON,
    launch_ready: TELEMETRY_LAUNCH_READY,
    in_flight: TELEMETRY_IN_FLIGHT,
    recovery: TELEMETRY_RECOVERY,
};

const _: () = {
    TELEMETRY_POWER_ON.validate();
    TELEMETRY_LAUNCH_READY.validate();
    TELEMETRY_IN_FLIGHT.validate();
    TELEMETRY_RECOVERY.validate();
};
