//! Radio framing: the words of one message as big-endian bytes followed by a
//! CRC-16/X25 frame check sequence.

use crc::{Crc, CRC_16_IBM_SDLC};

use crate::*;

const X25: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

pub const FCS_LEN: usize = 2;
pub const MAX_FRAME_LEN: usize = MAX_WORDS * 8 + FCS_LEN;

pub type Frame = heapless::Vec<u8, MAX_FRAME_LEN>;

pub fn frame_check_sequence(data: &[u8]) -> u16 {
    X25.checksum(data)
}

pub fn frame(words: &[u64]) -> Result<Frame, TelemetryError> {
    let mut frame = Frame::new();
    for word in words {
        frame.extend_from_slice(&word.to_be_bytes()).map_err(|_| TelemetryError::Overflow)?;
    }

    let fcs = frame_check_sequence(&frame);
    frame.extend_from_slice(&fcs.to_be_bytes()).map_err(|_| TelemetryError::Overflow)?;
    Ok(frame)
}

pub fn unframe(bytes: &[u8]) -> Result<Words, TelemetryError> {
    if bytes.len() < 8 + FCS_LEN || bytes.len() > MAX_FRAME_LEN || (bytes.len() - FCS_LEN) % 8 != 0 {
        return Err(TelemetryError::FrameLength(bytes.len()));
    }

    let (data, fcs) = bytes.split_at(bytes.len() - FCS_LEN);
    let expected = u16::from_be_bytes([fcs[0], fcs[1]]);
    let actual = frame_check_sequence(data);
    if expected != actual {
        return Err(TelemetryError::Checksum { expected, actual });
    }

    let mut words = Words::new();
    for chunk in data.chunks_exact(8) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        words.push(u64::from_be_bytes(bytes)).map_err(|_| TelemetryError::Overflow)?;
    }

    Ok(words)
}
