#![cfg_attr(target_os="none", no_std)] // this is imported by the firmware, so no standard library

//! Altitude estimation, flight phase logic and the per-cycle flight computer
//! loop. Hardware access goes through the traits in [io].

pub mod altitude;
pub mod complementary;
pub mod flight_computer;
pub mod io;
pub mod kalman;
pub mod state_machine;

pub use altitude::AltitudeEstimator;
pub use flight_computer::FlightComputer;
pub use io::*;
pub use state_machine::{FlightStateMachine, MainDeployStage, StateMachineMemory};

/// Standard gravity used throughout the estimator, in m/s².
pub const GRAVITY: f32 = 9.81;
