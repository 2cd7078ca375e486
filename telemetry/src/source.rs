use shared_types::FlightRecord;

use crate::*;

/// Anything that can supply values for telemetry fields.
pub trait FieldSource {
    fn field_value(&self, field: Field) -> FieldValue;
}

impl FieldSource for FlightRecord {
    fn field_value(&self, field: Field) -> FieldValue {
        let snapshot = &self.snapshot;
        let gps = &snapshot.gps;

        match field {
            Field::FlightPhase => FieldValue::Unsigned(self.phase as u32),
            Field::MissionTime => FieldValue::Unsigned(self.mission_time),
            Field::FailureFlags => FieldValue::Unsigned(self.failures.bits().into()),

            Field::Acceleration(dim) => FieldValue::Float(snapshot.accel[dim as usize]),
            Field::AngularVelocity(dim) => FieldValue::Float(snapshot.gyro[dim as usize]),
            Field::MagneticFluxDensity(dim) => FieldValue::Float(snapshot.mag[dim as usize]),
            Field::Altitude => FieldValue::Float(self.estimate.altitude),
            Field::VerticalVelocity => FieldValue::Float(self.estimate.vertical_velocity),

            Field::ExternalTemperature => FieldValue::Float(snapshot.external_temp),
            Field::AvionicsBayTemperature => FieldValue::Float(snapshot.avbay_temp),
            Field::EngineBayTemperature => FieldValue::Float(snapshot.engbay_temp),

            Field::LongitudeSign | Field::Longitude => FieldValue::Float(gps.longitude),
            Field::LatitudeSign | Field::Latitude => FieldValue::Float(gps.latitude),
            Field::GpsAltitude => FieldValue::Float(gps.altitude),
            Field::GpsSpeed => FieldValue::Float(gps.speed),
            Field::GpsFix => FieldValue::Unsigned(gps.fix as u32),
            Field::GpsQuality => FieldValue::Unsigned(gps.quality.into()),
            Field::GpsSatellites => FieldValue::Unsigned(gps.satellites.into()),
            Field::GpsAntennaStatus => FieldValue::Unsigned(gps.antenna_status.into()),
        }
    }
}
