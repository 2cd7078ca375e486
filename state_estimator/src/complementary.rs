//! Complementary filter blending barometric altitude with integrated vertical
//! acceleration.

#[cfg(target_os = "none")]
use num_traits::Float;

/// Number of past accelerations checked for a zero-velocity update.
pub const ZUPT_WINDOW: usize = 12;

#[derive(Clone, Debug)]
pub struct ComplementaryFilter {
    /// position and velocity gains
    gain: [f32; 2],
    /// |acceleration| below which the vehicle may be at rest (m/s²)
    accel_threshold: f32,
    zupt: [f32; ZUPT_WINDOW],
    zupt_index: usize,
}

impl ComplementaryFilter {
    pub fn new(sigma_accel: f32, sigma_baro: f32, accel_threshold: f32) -> Self {
        Self {
            gain: [(2.0 * sigma_accel / sigma_baro).sqrt(), sigma_accel / sigma_baro],
            accel_threshold,
            zupt: [0.0; ZUPT_WINDOW],
            zupt_index: 0,
        }
    }

    pub fn reset(&mut self) {
        self.zupt = [0.0; ZUPT_WINDOW];
        self.zupt_index = 0;
    }

    /// Returns the new `(altitude, velocity)`.
    pub fn estimate(
        &mut self,
        baro_altitude: f32,
        past_altitude: f32,
        past_velocity: f32,
        accel: f32,
        dt: f32,
    ) -> (f32, f32) {
        let [k1, k2] = self.gain;
        let error = baro_altitude - past_altitude;

        let altitude = past_altitude + dt * (past_velocity + (k1 + k2 * dt / 2.0) * error) + accel * dt * dt / 2.0;
        let velocity = past_velocity + dt * (k2 * error + accel);

        (altitude, self.zero_velocity_update(accel, velocity))
    }

    /// Forces the velocity to zero once the last [ZUPT_WINDOW] accelerations
    /// were all below the threshold.
    fn zero_velocity_update(&mut self, accel: f32, velocity: f32) -> f32 {
        self.zupt[self.zupt_index] = accel;
        self.zupt_index = (self.zupt_index + 1) % ZUPT_WINDOW;

        if self.zupt.iter().any(|a| a.abs() > self.accel_threshold) {
            velocity
        } else {
            0.0
        }
    }
}
