use shared_types::FlightPhase;

use crate::*;

/// Reads the flight phase from the top bits of a message's first word.
pub fn peek_phase(word: u64) -> Result<FlightPhase, TelemetryError> {
    let code = bitpack::get_field(word, PHASE_BITS, bitpack::WORD_BITS - PHASE_BITS) as u8;
    FlightPhase::try_from(code).map_err(|_| TelemetryError::UnknownPhase(code))
}

impl TelemetrySchema {
    pub fn encode<S: FieldSource>(&self, phase: FlightPhase, source: &S) -> Result<Words, TelemetryError> {
        self.message(phase).collect(source)
    }

    /// Decodes a message for a known phase. The word count has to match the
    /// phase's layout exactly.
    pub fn decode(&self, phase: FlightPhase, words: &[u64]) -> Result<DecodedTelemetry, TelemetryError> {
        let message = self.message(phase);
        let expected = message.word_count();
        if words.len() != expected {
            return Err(TelemetryError::WordCount {
                phase,
                expected,
                actual: words.len(),
            });
        }

        let mut decoded = DecodedTelemetry::new(phase);
        message.read(words, |field, value| decoded.apply(field, value))?;
        Ok(decoded)
    }

    /// Decodes a message using the phase it carries in its header.
    pub fn decode_any(&self, words: &[u64]) -> Result<DecodedTelemetry, TelemetryError> {
        let first = words.first().ok_or(TelemetryError::OutOfWords)?;
        self.decode(peek_phase(*first)?, words)
    }
}

pub fn encode<S: FieldSource>(phase: FlightPhase, source: &S) -> Result<Words, TelemetryError> {
    DOWNLINK_SCHEMA.encode(phase, source)
}

pub fn decode(phase: FlightPhase, words: &[u64]) -> Result<DecodedTelemetry, TelemetryError> {
    DOWNLINK_SCHEMA.decode(phase, words)
}

pub fn decode_any(words: &[u64]) -> Result<DecodedTelemetry, TelemetryError> {
    DOWNLINK_SCHEMA.decode_any(words)
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;
    use shared_types::*;

    use super::*;

    fn record(phase: FlightPhase) -> FlightRecord {
        let mut failures = FailureFlags::empty();
        failures.set(Failure::Barometer);
        failures.set(Failure::Gps);

        FlightRecord {
            phase,
            snapshot: SensorSnapshot {
                accel: Vector3::new(3.0, 12.5, 55.25),
                gyro: Vector3::new(-90.0, 45.5, 180.0),
                mag: Vector3::new(0.25, -0.5, 1.0),
                baro_altitude: 1000.0,
                baro_temp: 20.0,
                external_temp: 25.5,
                avbay_temp: 31.0,
                engbay_temp: 40.0,
                gps: GpsDatum {
                    latitude: 32.990_25,
                    longitude: -106.975_5,
                    altitude: 1402.5,
                    speed: 12.0,
                    fix: true,
                    quality: 2,
                    satellites: 7,
                    antenna_status: 3,
                },
                failures,
                timestamp_millis: 123_456,
            },
            estimate: FusedEstimate {
                altitude: 1012.5,
                vertical_velocity: 120.0,
                vertical_acceleration: 30.0,
            },
            failures,
            mission_time: 42_000,
        }
    }

    fn assert_close(actual: Option<f32>, expected: f32, tolerance: f32) {
        let actual = actual.unwrap();
        assert!((actual - expected).abs() <= tolerance, "{actual} != {expected}");
    }

    #[test]
    fn should_encode_power_on_into_one_word() {
        let words = encode(FlightPhase::PowerOn, &record(FlightPhase::PowerOn)).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(peek_phase(words[0]), Ok(FlightPhase::PowerOn));

        let decoded = decode(FlightPhase::PowerOn, &words).unwrap();
        assert_close(decoded.external_temperature, 25.5, 0.07);
        assert_close(decoded.avionics_bay_temperature, 31.0, 0.07);
        assert_close(decoded.engine_bay_temperature, 40.0, 0.07);
        assert_eq!(decoded.gps_quality, Some(2));
        assert_eq!(decoded.gps_fix, Some(true));
        assert_eq!(decoded.gps_satellites, Some(7));
        assert_eq!(decoded.gps_antenna_status, Some(3));
        assert_eq!(decoded.failures, Some(record(FlightPhase::PowerOn).failures));
        assert_eq!(decoded.altitude, None);
        assert_eq!(decoded.latitude, None);
    }

    #[test]
    fn should_round_trip_in_flight_message() {
        let source = record(FlightPhase::Coast);
        let words = encode(FlightPhase::Coast, &source).unwrap();
        assert_eq!(words.len(), 5);

        let decoded = decode_any(&words).unwrap();
        assert_eq!(decoded.phase, FlightPhase::Coast);
        assert_eq!(decoded.mission_time, Some(42_000));
        assert_close(decoded.altitude, 1012.5, 0.1);
        assert_close(decoded.vertical_velocity, 120.0, 0.013);
        assert_close(decoded.acceleration[0], 3.0, 0.05);
        assert_close(decoded.acceleration[1], 12.5, 0.05);
        assert_close(decoded.acceleration[2], 55.25, 0.064);
        assert_close(decoded.angular_velocity[0], -90.0, 0.003);
        assert_close(decoded.angular_velocity[2], 180.0, 0.006);
        assert_close(decoded.magnetic_flux_density[1], -0.5, 0.02);
        assert_close(decoded.gps_altitude, 1402.5, 0.1);
        assert_close(decoded.gps_speed, 12.0, 0.1);
        assert_close(decoded.latitude, 32.990_25, 5e-5);
        assert_close(decoded.longitude, -106.975_5, 5e-5);
    }

    #[test]
    fn should_use_fused_altitude() {
        let mut source = record(FlightPhase::Coast);
        source.snapshot.accel.x = 0.0;
        let decoded = decode(FlightPhase::Coast, &encode(FlightPhase::Coast, &source).unwrap()).unwrap();
        assert_close(decoded.altitude, 1012.5, 0.1);
    }

    #[test]
    fn should_clamp_out_of_range_values() {
        let mut source = record(FlightPhase::LaunchReady);
        source.estimate.altitude = -20.0;
        source.estimate.vertical_velocity = 1000.0;
        source.snapshot.external_temp = -40.0;

        let words = encode(FlightPhase::LaunchReady, &source).unwrap();
        let decoded = decode(FlightPhase::LaunchReady, &words).unwrap();
        assert_eq!(decoded.altitude, Some(0.0));
        assert_eq!(decoded.external_temperature, Some(-15.0));
        assert_close(decoded.vertical_velocity, 350.0, 0.013);
        // neighbouring fields are not corrupted by the clamped ones
        assert_close(decoded.angular_velocity[2], 180.0, 0.006);
        assert_close(decoded.avionics_bay_temperature, 31.0, 0.07);
    }

    #[test]
    fn should_reject_wrong_word_count() {
        let words = encode(FlightPhase::Recovery, &record(FlightPhase::Recovery)).unwrap();
        assert_eq!(words.len(), 2);

        assert_eq!(
            decode(FlightPhase::Recovery, &words[..1]),
            Err(TelemetryError::WordCount {
                phase: FlightPhase::Recovery,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            decode(FlightPhase::Coast, &words),
            Err(TelemetryError::WordCount {
                phase: FlightPhase::Coast,
                expected: 5,
                actual: 2
            })
        );
        assert_eq!(decode_any(&[]), Err(TelemetryError::OutOfWords));
    }

    #[test]
    fn should_reject_unknown_phase() {
        assert_eq!(peek_phase(0xf000_0000_0000_0000), Err(TelemetryError::UnknownPhase(15)));
        assert_eq!(decode_any(&[0xa000_0000_0000_0000]), Err(TelemetryError::UnknownPhase(10)));
    }

    #[test]
    fn consecutive_encodes_do_not_alias() {
        let first = encode(FlightPhase::Recovery, &record(FlightPhase::Recovery)).unwrap();
        let mut other = record(FlightPhase::Recovery);
        other.snapshot.external_temp = 100.0;
        let second = encode(FlightPhase::Recovery, &other).unwrap();
        assert_ne!(first, second);
        assert_eq!(first, encode(FlightPhase::Recovery, &record(FlightPhase::Recovery)).unwrap());
    }
}
