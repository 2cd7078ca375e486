//! Kalman filter tracking the direction of gravity in the sensor frame.
//!
//! The gyroscope rotates the gravity estimate between samples, the
//! accelerometer corrects it. Projecting the measured specific force onto the
//! estimated gravity direction gives the vertical acceleration.

use nalgebra::{Matrix3, Vector3};
#[cfg(target_os = "none")]
use num_traits::Float;

use crate::GRAVITY;

/// Initial error covariance, large since the orientation is unknown at power-up.
const INITIAL_COVARIANCE: f32 = 100.0;

#[derive(Clone, Debug)]
pub struct VerticalAccelerationFilter {
    /// acceleration model constant
    ca: f32,
    /// gyroscope standard deviation (rad/s)
    sigma_gyro: f32,
    /// accelerometer standard deviation (g)
    sigma_accel: f32,
    /// gravity direction in the sensor frame
    state: Vector3<f32>,
    /// error covariance of `state`
    covariance: Matrix3<f32>,
    /// non-gravitational acceleration seen in the last step (m/s²)
    accel_sensor: Vector3<f32>,
}

fn skew(v: &Vector3<f32>) -> Matrix3<f32> {
    Matrix3::new(
        0.0, -v.z, v.y,
        v.z, 0.0, -v.x,
        -v.y, v.x, 0.0,
    )
}

impl VerticalAccelerationFilter {
    pub fn new(ca: f32, sigma_gyro: f32, sigma_accel: f32) -> Self {
        Self {
            ca,
            sigma_gyro,
            sigma_accel,
            state: Vector3::z(),
            covariance: Matrix3::identity() * INITIAL_COVARIANCE,
            accel_sensor: Vector3::zeros(),
        }
    }

    pub fn reset(&mut self) {
        self.state = Vector3::z();
        self.covariance = Matrix3::identity() * INITIAL_COVARIANCE;
        self.accel_sensor = Vector3::zeros();
    }

    pub fn gravity_direction(&self) -> &Vector3<f32> {
        &self.state
    }

    /// Runs one predict/update cycle and returns the vertical acceleration
    /// (m/s², gravity removed).
    ///
    /// `gyro` is in rad/s, `accel` in g.
    pub fn estimate(&mut self, gyro: &Vector3<f32>, accel: &Vector3<f32>, dt: f32) -> f32 {
        let accel = accel * GRAVITY;

        // Prediction: rotate the previous gravity estimate by the gyro rates.
        let transition = Matrix3::identity() - skew(gyro) * dt;
        let predicted_state = transition * self.state;
        let skew_state = skew(&self.state);
        let process_noise = skew_state * skew_state * (-(dt * dt) * self.sigma_gyro.powi(2));
        let predicted_covariance = transition * self.covariance * transition.transpose() + process_noise;

        // Update with the accelerometer, discounting the acceleration seen in
        // the previous step by the acceleration model.
        let measurement = Matrix3::identity() * GRAVITY;
        let measurement_noise = Matrix3::identity()
            * (self.sigma_accel.powi(2) + self.ca.powi(2) * self.accel_sensor.norm_squared() / 3.0);
        let innovation_covariance =
            measurement * predicted_covariance * measurement.transpose() + measurement_noise;

        match innovation_covariance.try_inverse() {
            Some(inverse) => {
                let gain = predicted_covariance * measurement.transpose() * inverse;
                let innovation = accel - self.accel_sensor * self.ca - measurement * predicted_state;
                self.state = predicted_state + gain * innovation;
                self.covariance = (Matrix3::identity() - gain * measurement) * predicted_covariance;
            }
            None => {
                log::debug!("singular innovation covariance, skipping accelerometer update");
                self.state = predicted_state;
                self.covariance = predicted_covariance;
            }
        }

        self.accel_sensor = accel - self.state * GRAVITY;
        accel.dot(&self.state) - GRAVITY
    }
}
