#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single failure condition. The discriminant is the bit position in
/// [FailureFlags], so each condition has exactly one owner bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Failure {
    AvionicsBayTemperature = 0,
    EngineBayTemperature = 1,
    Imu = 2,
    Barometer = 3,
    ExternalTemperature = 4,
    Gps = 5,
    Datalog = 6,
    Radio = 7,
    DroguePyro = 8,
    MainPyro = 9,
}

impl Failure {
    pub const ALL: [Failure; 10] = [
        Self::AvionicsBayTemperature,
        Self::EngineBayTemperature,
        Self::Imu,
        Self::Barometer,
        Self::ExternalTemperature,
        Self::Gps,
        Self::Datalog,
        Self::Radio,
        Self::DroguePyro,
        Self::MainPyro,
    ];

    const fn mask(self) -> u16 {
        1 << (self as u8)
    }
}

/// Bit-set of currently active failure conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FailureFlags(u16);

impl FailureFlags {
    /// Number of bits that carry a named condition. Telemetry only sends these.
    pub const USED_BITS: u32 = Failure::ALL.len() as u32;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub fn set(&mut self, failure: Failure) {
        self.0 |= failure.mask();
    }

    pub fn clear(&mut self, failure: Failure) {
        self.0 &= !failure.mask();
    }

    pub fn assign(&mut self, failure: Failure, active: bool) {
        if active {
            self.set(failure)
        } else {
            self.clear(failure)
        }
    }

    pub const fn contains(&self, failure: Failure) -> bool {
        self.0 & failure.mask() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Failure> + '_ {
        Failure::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl core::ops::BitOr for FailureFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<Failure> for FailureFlags {
    fn from(failure: Failure) -> Self {
        Self(failure.mask())
    }
}
