#[cfg(feature = "serde")]
use serde::Serialize;
use shared_types::{FailureFlags, FlightPhase};

use crate::*;

/// Telemetry values reconstructed on the ground. Fields the phase's message
/// does not carry stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DecodedTelemetry {
    pub phase: FlightPhase,
    pub mission_time: Option<u32>,
    pub failures: Option<FailureFlags>,

    pub acceleration: [Option<f32>; 3],
    pub angular_velocity: [Option<f32>; 3],
    pub magnetic_flux_density: [Option<f32>; 3],
    pub altitude: Option<f32>,
    pub vertical_velocity: Option<f32>,

    pub external_temperature: Option<f32>,
    pub avionics_bay_temperature: Option<f32>,
    pub engine_bay_temperature: Option<f32>,

    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    pub gps_altitude: Option<f32>,
    pub gps_speed: Option<f32>,
    pub gps_fix: Option<bool>,
    pub gps_quality: Option<u8>,
    pub gps_satellites: Option<u8>,
    pub gps_antenna_status: Option<u8>,

    #[cfg_attr(feature = "serde", serde(skip))]
    latitude_positive: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    longitude_positive: bool,
}

impl DecodedTelemetry {
    pub fn new(phase: FlightPhase) -> Self {
        Self {
            phase,
            latitude_positive: true,
            longitude_positive: true,
            ..Default::default()
        }
    }

    /// Stores one decoded field. Sign fields precede their magnitude in every
    /// layout, so the magnitude picks up the sign seen last.
    pub fn apply(&mut self, field: Field, value: FieldValue) {
        let float = value.as_f32();
        let small = value.as_u32().min(u8::MAX as u32) as u8;

        match field {
            // the phase was already known to select the layout
            Field::FlightPhase => {}
            Field::MissionTime => self.mission_time = Some(value.as_u32()),
            Field::FailureFlags => self.failures = Some(FailureFlags::from_bits(value.as_u32() as u16)),

            Field::Acceleration(dim) => self.acceleration[dim as usize] = Some(float),
            Field::AngularVelocity(dim) => self.angular_velocity[dim as usize] = Some(float),
            Field::MagneticFluxDensity(dim) => self.magnetic_flux_density[dim as usize] = Some(float),
            Field::Altitude => self.altitude = Some(float),
            Field::VerticalVelocity => self.vertical_velocity = Some(float),

            Field::ExternalTemperature => self.external_temperature = Some(float),
            Field::AvionicsBayTemperature => self.avionics_bay_temperature = Some(float),
            Field::EngineBayTemperature => self.engine_bay_temperature = Some(float),

            Field::LongitudeSign => self.longitude_positive = value.as_u32() == 1,
            Field::Longitude => self.longitude = Some(signed(self.longitude_positive, float)),
            Field::LatitudeSign => self.latitude_positive = value.as_u32() == 1,
            Field::Latitude => self.latitude = Some(signed(self.latitude_positive, float)),
            Field::GpsAltitude => self.gps_altitude = Some(float),
            Field::GpsSpeed => self.gps_speed = Some(float),
            Field::GpsFix => self.gps_fix = Some(value.as_u32() == 1),
            Field::GpsQuality => self.gps_quality = Some(small),
            Field::GpsSatellites => self.gps_satellites = Some(small),
            Field::GpsAntennaStatus => self.gps_antenna_status = Some(small),
        }
    }
}

fn signed(positive: bool, magnitude: f32) -> f32 {
    if positive {
        magnitude
    } else {
        -magnitude
    }
}
