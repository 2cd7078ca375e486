//! Flight parameters. These are fixed when the flight computer is constructed
//! and never change while it runs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Noise parameters for the altitude estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorSettings {
    /// gyroscope standard deviation (rad/s)
    pub sigma_gyro: f32,
    /// accelerometer standard deviation (g)
    pub sigma_accel: f32,
    /// barometer standard deviation (m)
    pub sigma_baro: f32,
    /// acceleration model constant, 0 = static, 1 = constant acceleration
    pub ca: f32,
    /// vertical acceleration below which the vehicle is considered at rest (m/s²)
    pub accel_threshold: f32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            sigma_gyro: 0.337,
            sigma_accel: 0.640,
            sigma_baro: 0.488,
            ca: 0.5,
            accel_threshold: 0.1,
        }
    }
}

/// Thresholds of the flight state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateMachineSettings {
    /// minimum vertical velocity for launch detection (m/s)
    pub launch_velocity: f32,
    /// vertical velocity window for apogee detection (m/s)
    pub apogee_velocity_min: f32,
    pub apogee_velocity_max: f32,
    /// altitude at or below which the main chute is deployed (m, 700 ft)
    pub main_deploy_altitude: f32,
    /// altitude below which the vehicle is considered recovered (m)
    pub recovery_altitude: f32,
}

impl Default for StateMachineSettings {
    fn default() -> Self {
        Self {
            launch_velocity: 0.1,
            apogee_velocity_min: 0.0,
            apogee_velocity_max: 1.0,
            main_deploy_altitude: 213.36,
            recovery_altitude: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    pub estimator: EstimatorSettings,
    pub state_machine: StateMachineSettings,
}
