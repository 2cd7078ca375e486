#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{FailureFlags, FlightPhase, SensorSnapshot};

/// Fused vertical motion, as produced by the altitude estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FusedEstimate {
    /// m
    pub altitude: f32,
    /// m/s
    pub vertical_velocity: f32,
    /// m/s²
    pub vertical_acceleration: f32,
}

/// The result of one control cycle. This is what gets logged and what the
/// telemetry encoder reads from. It is `Copy` so a transmit task can take a
/// snapshot of it instead of holding a reference into the control loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightRecord {
    pub phase: FlightPhase,
    pub snapshot: SensorSnapshot,
    pub estimate: FusedEstimate,
    pub failures: FailureFlags,
    /// ms since launch was detected, or since power-on before that
    pub mission_time: u32,
}
