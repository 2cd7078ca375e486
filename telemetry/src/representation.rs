use core::ops::RangeInclusive;

#[cfg(target_os = "none")]
use num_traits::Float;

use crate::quantize::{self, max_code};

/// How a field's value is turned into its bits on the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Representation {
    /// Plain unsigned integer, saturating at the field width.
    Unsigned { bits: u32 },
    /// DLT-quantized float.
    Quantized { bits: u32, min: f32, max: f32, spacing: f32 },
    /// Sign half of a sign-magnitude pair: 1 when the value is positive.
    Sign,
    /// Magnitude half of a sign-magnitude pair: `trunc(|value| * scale)`.
    Magnitude { bits: u32, scale: f32 },
}

/// A field value before encoding or after decoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Unsigned(u32),
    Float(f32),
}

impl FieldValue {
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Unsigned(u) => u as f32,
            Self::Float(f) => f,
        }
    }

    /// Floats are truncated and saturated into range.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Unsigned(u) => u,
            Self::Float(f) => f as u32,
        }
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl Representation {
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Unsigned { bits } => *bits,
            Self::Quantized { bits, .. } => *bits,
            Self::Sign => 1,
            Self::Magnitude { bits, .. } => *bits,
        }
    }

    pub const fn unsigned(bits: u32) -> Self {
        Self::Unsigned { bits }
    }

    pub const fn quantized(bits: u32, range: RangeInclusive<f32>, spacing: f32) -> Self {
        Self::Quantized {
            bits,
            min: *range.start(),
            max: *range.end(),
            spacing,
        }
    }

    pub const fn magnitude(bits: u32, scale: f32) -> Self {
        Self::Magnitude { bits, scale }
    }

    /// Turns a value into a code that always fits into [Self::bits].
    pub fn encode(&self, value: FieldValue) -> u64 {
        match *self {
            Self::Unsigned { bits } => u64::from(value.as_u32()).min(max_code(bits)),
            Self::Quantized { bits, min, max, spacing } => {
                quantize::serialize(bits, min, max, value.as_f32(), spacing) as u64
            }
            Self::Sign => (value.as_f32() > 0.0) as u64,
            Self::Magnitude { bits, scale } => {
                let magnitude = (value.as_f32().abs() * scale).trunc();
                if magnitude.is_nan() {
                    0
                } else if magnitude >= max_code(bits) as f32 {
                    max_code(bits)
                } else {
                    magnitude as u64
                }
            }
        }
    }

    pub fn decode(&self, code: u64) -> FieldValue {
        match *self {
            Self::Unsigned { .. } | Self::Sign => FieldValue::Unsigned(code as u32),
            Self::Quantized { min, spacing, .. } => FieldValue::Float(quantize::deserialize(code as u32, min, spacing)),
            Self::Magnitude { scale, .. } => FieldValue::Float(code as f32 / scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_saturate_unsigned_fields() {
        let repr = Representation::unsigned(4);
        assert_eq!(repr.encode(FieldValue::Unsigned(9)), 9);
        assert_eq!(repr.encode(FieldValue::Unsigned(15)), 15);
        assert_eq!(repr.encode(FieldValue::Unsigned(300)), 15);
        assert_eq!(repr.decode(9), FieldValue::Unsigned(9));
    }

    #[test]
    fn should_encode_sign_and_magnitude() {
        let magnitude = Representation::magnitude(28, 1_000_000.0);
        assert_eq!(Representation::Sign.encode(FieldValue::Float(-86.9)), 0);
        assert_eq!(Representation::Sign.encode(FieldValue::Float(0.0)), 0);
        assert_eq!(Representation::Sign.encode(FieldValue::Float(33.2)), 1);
        assert_eq!(magnitude.encode(FieldValue::Float(-86.5)), 86_500_000);
        assert_eq!(magnitude.encode(FieldValue::Float(500.0)), max_code(28));

        let FieldValue::Float(f) = magnitude.decode(86_500_000) else {
            panic!("magnitude decodes to a float")
        };
        assert!((f - 86.5).abs() < 1e-4);
    }

    #[test]
    fn should_quantize_through_representation() {
        let repr = Representation::quantized(11, -15.0..=125.0, 0.0683927699072);
        assert_eq!(repr.bits(), 11);
        assert_eq!(repr.encode(FieldValue::Float(-5.0)), 146);
        assert_eq!(repr.encode(FieldValue::Float(1000.0)), 2047);
    }
}
