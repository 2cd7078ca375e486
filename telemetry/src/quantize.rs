//! Discrete lossy transform: maps a bounded float range onto fixed-width
//! unsigned codes with a fixed spacing between codes.

#[cfg(target_os = "none")]
use num_traits::Float;

/// Largest code that fits in `bits` bits.
pub const fn max_code(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Quantizes `reading` to `floor((reading - min) / spacing)`.
///
/// Readings at or below `min` map to 0 and readings at or above `max` map to
/// the largest code of the field, so the result always fits in `bits`. NaN is
/// treated as `min`.
pub fn serialize(bits: u32, min: f32, max: f32, reading: f32, spacing: f32) -> u32 {
    let top = max_code(bits.min(32)) as u32;

    if reading.is_nan() || reading <= min {
        if reading < min {
            log::trace!("clamping {} to lower bound {}", reading, min);
        }
        return 0;
    }

    if reading >= max {
        if reading > max {
            log::trace!("clamping {} to upper bound {}", reading, max);
        }
        return top;
    }

    let code = ((reading - min) / spacing).floor();
    if code >= top as f32 {
        top
    } else {
        code as u32
    }
}

/// Inverse of [serialize], returning the lower edge of the code's interval.
pub fn deserialize(code: u32, min: f32, spacing: f32) -> f32 {
    code as f32 * spacing + min
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXT_TEMP_SPACING: f32 = 0.0683927699072;

    #[test]
    fn should_quantize_external_temperature() {
        assert_eq!(serialize(11, -15.0, 125.0, -15.0, EXT_TEMP_SPACING), 0);
        assert_eq!(serialize(11, -15.0, 125.0, 125.0, EXT_TEMP_SPACING), 2047);
        assert_eq!(serialize(11, -15.0, 125.0, -5.0, EXT_TEMP_SPACING), 146);
        assert_eq!(serialize(11, -15.0, 125.0, -6.529249, EXT_TEMP_SPACING), 123);
        assert_eq!(serialize(11, -15.0, 125.0, 31.941842, EXT_TEMP_SPACING), 686);
        assert_eq!(serialize(11, -15.0, 125.0, 25.5, EXT_TEMP_SPACING), 592);
    }

    #[test]
    fn should_clamp_out_of_range_readings() {
        assert_eq!(serialize(11, -15.0, 125.0, -15.0001, EXT_TEMP_SPACING), 0);
        assert_eq!(serialize(11, -15.0, 125.0, -20.0, EXT_TEMP_SPACING), 0);
        assert_eq!(serialize(11, -15.0, 125.0, 125.1, EXT_TEMP_SPACING), 2047);
        assert_eq!(serialize(11, -15.0, 125.0, 150.0, EXT_TEMP_SPACING), 2047);
        assert_eq!(serialize(11, -15.0, 125.0, f32::INFINITY, EXT_TEMP_SPACING), 2047);
        assert_eq!(serialize(11, -15.0, 125.0, f32::NEG_INFINITY, EXT_TEMP_SPACING), 0);
        assert_eq!(serialize(11, -15.0, 125.0, f32::NAN, EXT_TEMP_SPACING), 0);
    }

    #[test]
    fn should_cap_codes_when_range_exceeds_width() {
        // range and spacing claim 1000 codes, but only 8 bits are available
        assert_eq!(serialize(8, 0.0, 100.0, 99.0, 0.1), 255);
    }

    #[test]
    fn should_dequantize_to_lower_edge() {
        assert_eq!(deserialize(0, -15.0, EXT_TEMP_SPACING), -15.0);
        assert!((deserialize(2047, -15.0, EXT_TEMP_SPACING) - 125.0).abs() < EXT_TEMP_SPACING);
        assert!((deserialize(146, -15.0, EXT_TEMP_SPACING) - -5.0).abs() < EXT_TEMP_SPACING);
    }

    #[test]
    fn round_trip_error_is_bounded_by_spacing() {
        let fields: [(u32, f32, f32); 4] = [
            (11, -15.0, EXT_TEMP_SPACING),
            (15, -50.0, 0.0122074037904),
            (9, 0.0, 0.0489236790607),
            (20, -1440.0, 0.0027465846506),
        ];

        for (bits, min, spacing) in fields {
            let max = min + spacing * max_code(bits) as f32;
            let upper = min + spacing * (max_code(bits) - 1) as f32;
            // f32 arithmetic on both sides can move a reading by a few ulps
            let slack = 4.0 * f32::EPSILON * (min.abs() + upper.abs());
            let steps = 997;
            for i in 0..=steps {
                let x = min + (upper - min) * (i as f32 / steps as f32);
                let y = deserialize(serialize(bits, min, max, x, spacing), min, spacing);
                let error = x - y;
                assert!(error >= -slack, "{x} -> {y} ({bits} bits)");
                assert!(error <= spacing + slack, "{x} -> {y} ({bits} bits)");
            }
        }
    }
}
