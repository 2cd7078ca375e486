use shared_types::FlightPhase;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TelemetryError {
    #[error("{phase:?} telemetry needs {expected} words, got {actual}")]
    WordCount {
        phase: FlightPhase,
        expected: usize,
        actual: usize,
    },
    #[error("unknown flight phase {0} in telemetry header")]
    UnknownPhase(u8),
    #[error("field width {0} is outside 1..=64")]
    InvalidWidth(u32),
    #[error("ran out of words while reading fields")]
    OutOfWords,
    #[error("message does not fit into the word buffer")]
    Overflow,
    #[error("frame of {0} bytes is not a whole number of words plus checksum")]
    FrameLength(usize),
    #[error("frame checksum mismatch (expected {expected:#06x}, got {actual:#06x})")]
    Checksum { expected: u16, actual: u16 },
}
