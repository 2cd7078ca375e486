use nalgebra::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::FailureFlags;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsDatum {
    /// degrees, positive north
    pub latitude: f32,
    /// degrees, positive east
    pub longitude: f32,
    /// m ASL
    pub altitude: f32,
    /// ground speed, m/s
    pub speed: f32,
    pub fix: bool,
    /// 0 = invalid, 1 = GPS, 2 = DGPS
    pub quality: u8,
    pub satellites: u8,
    pub antenna_status: u8,
}

/// Everything the sensor layer read during one control-loop iteration.
/// Fields whose read failed this cycle are flagged in `failures`; their value
/// is whatever the driver left in them and must not be trusted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSnapshot {
    /// m/s²
    pub accel: Vector3<f32>,
    /// deg/s
    pub gyro: Vector3<f32>,
    /// gauss
    pub mag: Vector3<f32>,
    /// m
    pub baro_altitude: f32,
    /// °C
    pub baro_temp: f32,
    /// °C
    pub external_temp: f32,
    /// °C
    pub avbay_temp: f32,
    /// °C
    pub engbay_temp: f32,
    pub gps: GpsDatum,
    pub failures: FailureFlags,
    pub timestamp_millis: u32,
}
