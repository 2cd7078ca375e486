#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid flight phase {0}")]
    InvalidPhase(u8),
    #[error("unknown ground command {0:#08x}")]
    UnknownCommand(u32),
}

/// Flight phase driven by the state machine. The discriminant is what goes
/// out on the radio in the 4-bit phase field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum FlightPhase {
    #[default]
    PowerOn = 0,
    LaunchReady = 1,
    PoweredFlight = 2,
    Burnout = 3,
    Coast = 4,
    Apogee = 5,
    DrogueDeployed = 6,
    MainDeployAttempt = 7,
    MainDeployed = 8,
    Recovery = 9,
}

impl TryFrom<u8> for FlightPhase {
    type Error = ConversionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PowerOn),
            1 => Ok(Self::LaunchReady),
            2 => Ok(Self::PoweredFlight),
            3 => Ok(Self::Burnout),
            4 => Ok(Self::Coast),
            5 => Ok(Self::Apogee),
            6 => Ok(Self::DrogueDeployed),
            7 => Ok(Self::MainDeployAttempt),
            8 => Ok(Self::MainDeployed),
            9 => Ok(Self::Recovery),
            _ => Err(ConversionError::InvalidPhase(value)),
        }
    }
}

impl FlightPhase {
    pub const ALL: [FlightPhase; 10] = [
        Self::PowerOn,
        Self::LaunchReady,
        Self::PoweredFlight,
        Self::Burnout,
        Self::Coast,
        Self::Apogee,
        Self::DrogueDeployed,
        Self::MainDeployAttempt,
        Self::MainDeployed,
        Self::Recovery,
    ];

    /// Everything between liftoff and touchdown.
    pub fn is_airborne(self) -> bool {
        self >= Self::PoweredFlight && self < Self::Recovery
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PowerOn => "Power On",
            Self::LaunchReady => "Launch Ready",
            Self::PoweredFlight => "Powered Flight",
            Self::Burnout => "Burnout",
            Self::Coast => "Coast",
            Self::Apogee => "Apogee",
            Self::DrogueDeployed => "Drogue Deployed",
            Self::MainDeployAttempt => "Main Deploy Attempt",
            Self::MainDeployed => "Main Deployed",
            Self::Recovery => "Recovery",
        }
    }
}

/// Commands the ground crew can send over the uplink. They bypass the
/// sensor-driven transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroundCommand {
    PowerOn,
    LaunchReady,
}

impl GroundCommand {
    /// ASCII "SPO"
    pub const POWER_ON_CODE: u32 = 0x53_50_4F;
    /// ASCII "SLR"
    pub const LAUNCH_READY_CODE: u32 = 0x53_4C_52;

    pub fn code(self) -> u32 {
        match self {
            Self::PowerOn => Self::POWER_ON_CODE,
            Self::LaunchReady => Self::LAUNCH_READY_CODE,
        }
    }

    pub fn target_phase(self) -> FlightPhase {
        match self {
            Self::PowerOn => FlightPhase::PowerOn,
            Self::LaunchReady => FlightPhase::LaunchReady,
        }
    }
}

impl TryFrom<u32> for GroundCommand {
    type Error = ConversionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            Self::POWER_ON_CODE => Ok(Self::PowerOn),
            Self::LAUNCH_READY_CODE => Ok(Self::LaunchReady),
            _ => Err(ConversionError::UnknownCommand(value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PyroChannel {
    Drogue,
    Main,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_discriminants_round_trip() {
        for phase in FlightPhase::ALL {
            assert_eq!(FlightPhase::try_from(phase as u8), Ok(phase));
        }
        assert_eq!(FlightPhase::try_from(10), Err(ConversionError::InvalidPhase(10)));
        assert_eq!(FlightPhase::try_from(15), Err(ConversionError::InvalidPhase(15)));
    }

    #[test]
    fn airborne_phases() {
        assert!(!FlightPhase::PowerOn.is_airborne());
        assert!(!FlightPhase::LaunchReady.is_airborne());
        assert!(FlightPhase::PoweredFlight.is_airborne());
        assert!(FlightPhase::MainDeployed.is_airborne());
        assert!(!FlightPhase::Recovery.is_airborne());
    }

    #[test]
    fn ground_command_codes() {
        assert_eq!(GroundCommand::try_from(5460047), Ok(GroundCommand::PowerOn));
        assert_eq!(GroundCommand::try_from(5459026), Ok(GroundCommand::LaunchReady));
        assert_eq!(GroundCommand::try_from(0x414243), Err(ConversionError::UnknownCommand(0x414243)));
        assert_eq!(GroundCommand::LaunchReady.target_phase(), FlightPhase::LaunchReady);
        assert_eq!(GroundCommand::try_from(GroundCommand::PowerOn.code()), Ok(GroundCommand::PowerOn));
    }
}
