use core::f32::consts::PI;

use nalgebra::Vector3;
use shared_types::{EstimatorSettings, FusedEstimate};

use crate::complementary::ComplementaryFilter;
use crate::kalman::VerticalAccelerationFilter;

/// Time step used when there is no usable previous timestamp (s).
pub const MIN_DT: f32 = 0.001;

/// Fuses accelerometer, gyroscope and barometer into altitude, vertical
/// velocity and vertical acceleration.
///
/// The Kalman step always runs on the IMU sample of the previous call, so the
/// acceleration estimate lags one cycle behind the barometer. The very first
/// call has no previous sample and reports zero acceleration.
#[derive(Clone, Debug)]
pub struct AltitudeEstimator {
    kalman: VerticalAccelerationFilter,
    complementary: ComplementaryFilter,
    /// previous gyroscope (rad/s) and accelerometer (g) reading
    past_imu: Option<(Vector3<f32>, Vector3<f32>)>,
    past_altitude: f32,
    past_velocity: f32,
    past_vertical_acceleration: f32,
    previous_time: Option<u32>,
}

impl AltitudeEstimator {
    pub fn new(settings: &EstimatorSettings) -> Self {
        Self {
            kalman: VerticalAccelerationFilter::new(settings.ca, settings.sigma_gyro, settings.sigma_accel),
            complementary: ComplementaryFilter::new(
                settings.sigma_accel,
                settings.sigma_baro,
                settings.accel_threshold,
            ),
            past_imu: None,
            past_altitude: 0.0,
            past_velocity: 0.0,
            past_vertical_acceleration: 0.0,
            previous_time: None,
        }
    }

    /// Sets the reference for the first time step. Without it the first
    /// sample is integrated over [MIN_DT].
    pub fn set_initial_time(&mut self, time: u32) {
        self.previous_time = Some(time);
    }

    /// Clears all history. Only for a reset commanded from the ground.
    pub fn reset_priors(&mut self) {
        self.kalman.reset();
        self.complementary.reset();
        self.past_imu = None;
        self.past_altitude = 0.0;
        self.past_velocity = 0.0;
        self.past_vertical_acceleration = 0.0;
        self.previous_time = None;
    }

    fn delta_time(&self, time: u32) -> f32 {
        match self.previous_time {
            Some(previous) => {
                let millis = time.wrapping_sub(previous);
                // zero, or the clock went backwards
                if millis == 0 || millis > i32::MAX as u32 {
                    MIN_DT
                } else {
                    millis as f32 / 1000.0
                }
            }
            None => MIN_DT,
        }
    }

    /// `accel` in g, `gyro` in deg/s, `baro_altitude` in m.
    pub fn estimate(&mut self, accel: &Vector3<f32>, gyro: &Vector3<f32>, baro_altitude: f32, time: u32) {
        let dt = self.delta_time(time);

        let vertical_acceleration = match &self.past_imu {
            Some((gyro, accel)) => self.kalman.estimate(gyro, accel, dt),
            None => 0.0,
        };
        let (altitude, velocity) = self.complementary.estimate(
            baro_altitude,
            self.past_altitude,
            self.past_velocity,
            self.past_vertical_acceleration,
            dt,
        );

        self.past_imu = Some((gyro * (PI / 180.0), *accel));
        self.past_altitude = altitude;
        self.past_velocity = velocity;
        self.past_vertical_acceleration = vertical_acceleration;
        self.previous_time = Some(time);
    }

    pub fn altitude(&self) -> f32 {
        self.past_altitude
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.past_velocity
    }

    pub fn vertical_acceleration(&self) -> f32 {
        self.past_vertical_acceleration
    }

    pub fn fused(&self) -> FusedEstimate {
        FusedEstimate {
            altitude: self.altitude(),
            vertical_velocity: self.vertical_velocity(),
            vertical_acceleration: self.vertical_acceleration(),
        }
    }
}
