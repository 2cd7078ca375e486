//! Helpers for turning hex dumps from the ground station back into
//! telemetry values.

use shared_types::FlightPhase;
use telemetry::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid hex value {0:?}")]
    InvalidHex(String),
    #[error("Odd number of hex digits")]
    OddLength,
}

fn strip(s: &str) -> String {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    s.replace('_', "")
}

/// Parses 64-bit words given as hex, with optional `0x` prefix and `_`
/// separators.
pub fn parse_words<S: AsRef<str>>(words: &[S]) -> Result<Vec<u64>, ParseError> {
    words
        .iter()
        .map(|word| {
            let digits = strip(word.as_ref());
            u64::from_str_radix(&digits, 16).map_err(|_| ParseError::InvalidHex(word.as_ref().to_string()))
        })
        .collect()
}

/// Parses a byte string such as `"1e 66 05 10"` or `"1e660510"`.
pub fn parse_bytes(hex: &str) -> Result<Vec<u8>, ParseError> {
    let digits: String = strip(hex).chars().filter(|c| !c.is_whitespace() && *c != ':').collect();
    if digits.len() % 2 != 0 {
        return Err(ParseError::OddLength);
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = digits.get(i..i + 2).ok_or_else(|| ParseError::InvalidHex(digits.clone()))?;
            u8::from_str_radix(pair, 16).map_err(|_| ParseError::InvalidHex(pair.to_string()))
        })
        .collect()
}

/// Decodes `words`, either with the given phase's layout or with the one
/// named in the first word.
pub fn decode_words(phase: Option<u8>, words: &[u64]) -> Result<DecodedTelemetry, Box<dyn std::error::Error>> {
    let decoded = match phase {
        Some(phase) => decode(FlightPhase::try_from(phase)?, words)?,
        None => decode_any(words)?,
    };

    Ok(decoded)
}

/// Checks the frame check sequence of a received frame and decodes it.
pub fn decode_frame(bytes: &[u8]) -> Result<DecodedTelemetry, TelemetryError> {
    let words = link::unframe(bytes)?;
    decode_any(&words)
}

#[cfg(test)]
mod tests {
    use shared_types::*;

    use super::*;

    #[test]
    fn should_parse_hex_words() {
        let words = parse_words(&["0x1e66_0510_c9f7_642a", "83a2f963fff80fff", "0"]).unwrap();
        assert_eq!(words, vec![0x1e66_0510_c9f7_642au64, 0x83a2_f963_fff8_0fff, 0]);

        assert_eq!(parse_words(&["xyz"]), Err(ParseError::InvalidHex("xyz".to_string())));
        assert!(parse_words(&["1_0000_0000_0000_0000"]).is_err());
    }

    #[test]
    fn should_parse_hex_bytes() {
        assert_eq!(parse_bytes("1e 66 05 10").unwrap(), vec![0x1e, 0x66, 0x05, 0x10]);
        assert_eq!(parse_bytes("0x1E:66").unwrap(), vec![0x1e, 0x66]);
        assert_eq!(parse_bytes("abc"), Err(ParseError::OddLength));
        assert!(parse_bytes("zz").is_err());
    }

    #[test]
    fn should_decode_frames_from_hex() {
        let record = FlightRecord {
            phase: FlightPhase::Recovery,
            snapshot: SensorSnapshot {
                gps: GpsDatum { satellites: 7, ..Default::default() },
                ..Default::default()
            },
            ..Default::default()
        };
        let words = encode(record.phase, &record).unwrap();
        let frame = link::frame(&words).unwrap();
        let hex: String = frame.iter().map(|b| format!("{:02x} ", b)).collect();

        let decoded = decode_frame(&parse_bytes(&hex).unwrap()).unwrap();
        assert_eq!(decoded.phase, FlightPhase::Recovery);
        assert_eq!(decoded.gps_satellites, Some(7));

        let mut corrupted = frame.to_vec();
        corrupted[3] ^= 0x10;
        assert!(matches!(decode_frame(&corrupted), Err(TelemetryError::Checksum { .. })));
    }

    #[test]
    fn should_decode_with_explicit_phase() {
        let words = [0u64];
        assert_eq!(decode_words(Some(0), &words).unwrap().phase, FlightPhase::PowerOn);
        assert!(decode_words(Some(12), &words).is_err());
        assert!(decode_words(Some(1), &words).is_err());
    }
}
