//! Flight phase logic. Decides, from the fused estimate alone, when the
//! vehicle has launched, burned out, coasted to apogee, and when to deploy
//! the recovery devices.
//!
//! None of the transitions are retried. A condition that never becomes true
//! leaves the vehicle in the phase it is in.

use log::{info, warn};
use shared_types::{FlightPhase, FusedEstimate, GroundCommand, PyroChannel, StateMachineSettings};

use crate::io::PyroDriver;

use FlightPhase::*;

/// Progress of the main deployment check. After the main charge is fired the
/// check alternates between evaluating the descent rate and re-arming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MainDeployStage {
    #[default]
    NotAttempted,
    /// next call compares the vertical velocity against the previous one
    Evaluating,
    /// next call only re-arms the check
    Armed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateMachineMemory {
    pub prev_altitude: f32,
    pub prev_vertical_acceleration: f32,
    pub prev_vertical_velocity: f32,
    pub apogee_altitude: f32,
    pub main_deploy: MainDeployStage,
    pub launch_start_time: u32,
}

impl StateMachineMemory {
    pub fn main_deploy_attempted(&self) -> bool {
        self.main_deploy == MainDeployStage::Evaluating
    }
}

#[derive(Clone, Debug)]
pub struct FlightStateMachine {
    phase: FlightPhase,
    memory: StateMachineMemory,
    settings: StateMachineSettings,
}

impl FlightStateMachine {
    pub fn new(settings: StateMachineSettings) -> Self {
        Self {
            phase: PowerOn,
            memory: StateMachineMemory::default(),
            settings,
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn memory(&self) -> &StateMachineMemory {
        &self.memory
    }

    /// Evaluates the transition table for the current phase once, then
    /// remembers `estimate` for the next call.
    pub fn step<P: PyroDriver>(&mut self, time: u32, estimate: &FusedEstimate, pyro: &mut P) -> FlightPhase {
        let settings = self.settings;
        let memory = self.memory;

        let altitude = estimate.altitude;
        let velocity = estimate.vertical_velocity;
        let acceleration = estimate.vertical_acceleration;

        let new_phase = match self.phase {
            PowerOn | LaunchReady => (acceleration > memory.prev_vertical_acceleration
                && velocity > settings.launch_velocity)
                .then_some(PoweredFlight),
            PoweredFlight => (acceleration < memory.prev_vertical_acceleration).then_some(Burnout),
            Burnout => Some(Coast),
            Coast => (settings.apogee_velocity_min..=settings.apogee_velocity_max)
                .contains(&velocity)
                .then_some(Apogee),
            Apogee => Some(DrogueDeployed),
            DrogueDeployed => (altitude <= settings.main_deploy_altitude).then_some(MainDeployAttempt),
            MainDeployAttempt => self.check_main_deployment(estimate),
            MainDeployed => (altitude < settings.recovery_altitude).then_some(Recovery),
            Recovery => None,
        };

        if let Some(phase) = new_phase {
            self.switch_phase(time, phase, estimate, pyro);
        }

        self.memory.prev_altitude = altitude;
        self.memory.prev_vertical_acceleration = acceleration;
        self.memory.prev_vertical_velocity = velocity;

        self.phase
    }

    fn check_main_deployment(&mut self, estimate: &FusedEstimate) -> Option<FlightPhase> {
        let deployed = match self.memory.main_deploy {
            MainDeployStage::Evaluating => {
                self.memory.main_deploy = MainDeployStage::Armed;
                estimate.vertical_velocity > self.memory.prev_vertical_velocity
            }
            MainDeployStage::Armed | MainDeployStage::NotAttempted => {
                self.memory.main_deploy = MainDeployStage::Evaluating;
                false
            }
        };

        if estimate.altitude < self.settings.recovery_altitude {
            Some(Recovery)
        } else if deployed {
            Some(MainDeployed)
        } else {
            None
        }
    }

    fn switch_phase<P: PyroDriver>(&mut self, time: u32, phase: FlightPhase, estimate: &FusedEstimate, pyro: &mut P) {
        info!(
            "{:?} -> {:?} at {}ms (alt {:.1}m, v {:.1}m/s, a {:.1}m/s²)",
            self.phase,
            phase,
            time,
            estimate.altitude,
            estimate.vertical_velocity,
            estimate.vertical_acceleration
        );

        match phase {
            PoweredFlight => self.memory.launch_start_time = time,
            Apogee => self.memory.apogee_altitude = estimate.altitude,
            DrogueDeployed => {
                info!("Firing drogue");
                pyro.fire(PyroChannel::Drogue);
            }
            MainDeployAttempt => {
                info!("Firing main");
                self.memory.main_deploy = MainDeployStage::Evaluating;
                pyro.fire(PyroChannel::Main);
            }
            _ => {}
        }

        self.phase = phase;
    }

    /// Ground crew override. Starts a fresh flight in the commanded phase.
    pub fn force_transition(&mut self, command: GroundCommand) {
        let phase = command.target_phase();
        if self.phase.is_airborne() {
            warn!("Ground command {:?} received in {:?}", command, self.phase);
        }

        info!("{:?} -> {:?} (ground command)", self.phase, phase);
        self.phase = phase;
        self.memory = StateMachineMemory::default();
    }
}
