//! Interfaces to the parts of the vehicle outside the flight core.

use shared_types::{GroundCommand, PyroChannel, SensorSnapshot};

/// Sensor layer. A failed read is reported through the snapshot's failure
/// flags, never as an error.
pub trait SensorSource {
    fn read(&mut self) -> SensorSnapshot;
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_millis(&self) -> u32;
}

/// Decoded radio uplink.
pub trait CommandSource {
    fn poll(&mut self) -> Option<GroundCommand>;
}

/// Pyrotechnic outputs. Each channel is fired at most once per flight.
pub trait PyroDriver {
    fn fire(&mut self, channel: PyroChannel);
}

/// A single pending command, consumed on the first poll.
impl CommandSource for Option<GroundCommand> {
    fn poll(&mut self) -> Option<GroundCommand> {
        self.take()
    }
}

/// Uplink that never delivers anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoUplink;

impl CommandSource for NoUplink {
    fn poll(&mut self) -> Option<GroundCommand> {
        None
    }
}
