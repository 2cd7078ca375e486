#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dim {
    X,
    Y,
    Z,
}

/// Quantity carried by one telemetry field.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    FlightPhase,
    MissionTime,
    FailureFlags,

    Acceleration(Dim),
    AngularVelocity(Dim),
    MagneticFluxDensity(Dim),
    Altitude,
    VerticalVelocity,

    ExternalTemperature,
    AvionicsBayTemperature,
    EngineBayTemperature,

    LongitudeSign,
    Longitude,
    LatitudeSign,
    Latitude,
    GpsAltitude,
    GpsSpeed,
    GpsFix,
    GpsQuality,
    GpsSatellites,
    GpsAntennaStatus,
}

#[cfg(not(target_os = "none"))]
impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            Self::FlightPhase => "Flight Phase".to_string(),
            Self::MissionTime => "Mission Time [ms]".to_string(),
            Self::FailureFlags => "Failure Flags".to_string(),
            Self::Acceleration(dim) => format!("Acceleration ({dim:?}) [m/s²]"),
            Self::AngularVelocity(dim) => format!("Angular Velocity ({dim:?}) [°/s]"),
            Self::MagneticFluxDensity(dim) => format!("Magnetic Flux Density ({dim:?}) [G]"),
            Self::Altitude => "Altitude [m]".to_string(),
            Self::VerticalVelocity => "Vertical Speed [m/s]".to_string(),
            Self::ExternalTemperature => "External Temperature [°C]".to_string(),
            Self::AvionicsBayTemperature => "Avionics Bay Temperature [°C]".to_string(),
            Self::EngineBayTemperature => "Engine Bay Temperature [°C]".to_string(),
            Self::LongitudeSign => "Longitude Sign".to_string(),
            Self::Longitude => "Longitude".to_string(),
            Self::LatitudeSign => "Latitude Sign".to_string(),
            Self::Latitude => "Latitude".to_string(),
            Self::GpsAltitude => "GPS Altitude [m]".to_string(),
            Self::GpsSpeed => "GPS Speed [m/s]".to_string(),
            Self::GpsFix => "GPS Fix".to_string(),
            Self::GpsQuality => "GPS Quality".to_string(),
            Self::GpsSatellites => "GPS Satellites".to_string(),
            Self::GpsAntennaStatus => "GPS Antenna Status".to_string(),
        })
    }
}
