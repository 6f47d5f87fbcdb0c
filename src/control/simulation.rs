use std::collections::HashSet;

use log::{debug, info};

use super::{
    environment::Atmosphere,
    launch_stages::{FlightEnvironment, Stage},
};
use crate::{
    constants::PhysicalConstants,
    errors::SimulationError,
    telemetry_system::telemetry::{FlightLog, TelemetryRecord, TelemetrySink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    Complete,
}

/// Fixed-step driver for a stage chain.
///
/// Tick `k` happens at `start_time + k * time_step`; the run completes after
/// the first tick whose time reaches `time_max`.
pub struct FlightSimulation<A: Atmosphere, S: TelemetrySink = FlightLog> {
    head: Stage,
    atmosphere: A,
    constants: PhysicalConstants,
    telemetry: S,
    start_time: f64,
    time: f64,
    time_step: f64,
    time_max: f64,
    ticks: u64,
    state: SimulationState,
}

impl<A: Atmosphere> FlightSimulation<A, FlightLog> {
    pub fn new(head: Stage, atmosphere: A, time_max: f64, time_step: f64) -> Result<Self, SimulationError> {
        Self::with_telemetry(head, atmosphere, FlightLog::new(), time_max, time_step)
    }
}

impl<A: Atmosphere, S: TelemetrySink> FlightSimulation<A, S> {
    /// Builds the simulation and records every stage's initial state at t=0.
    pub fn with_telemetry(
        mut head: Stage,
        atmosphere: A,
        mut telemetry: S,
        time_max: f64,
        time_step: f64,
    ) -> Result<Self, SimulationError> {
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "time_step must be positive, got {}",
                time_step
            )));
        }
        if !time_max.is_finite() || time_max < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "time_max must be a non-negative number, got {}",
                time_max
            )));
        }

        let mut ids = HashSet::new();
        for stage in head.iter() {
            if !ids.insert(stage.id()) {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "stage id {} is used more than once",
                    stage.id()
                )));
            }
        }

        head.sample_atmosphere(&atmosphere);
        for stage in head.iter() {
            telemetry.record(&TelemetryRecord::capture(stage, 0.0))?;
        }

        let state = if time_max > 0.0 {
            SimulationState::Running
        } else {
            SimulationState::Complete
        };

        Ok(FlightSimulation {
            head,
            atmosphere,
            constants: PhysicalConstants::default(),
            telemetry,
            start_time: 0.0,
            time: 0.0,
            time_step,
            time_max,
            ticks: 0,
            state,
        })
    }

    pub fn with_constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn time_max(&self) -> f64 {
        self.time_max
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn head(&self) -> &Stage {
        &self.head
    }

    pub fn telemetry(&self) -> &S {
        &self.telemetry
    }

    pub fn into_parts(self) -> (Stage, S) {
        (self.head, self.telemetry)
    }

    /// Runs a single tick. Returns the state after it; a completed
    /// simulation is left untouched.
    pub fn step(&mut self) -> Result<SimulationState, SimulationError> {
        if self.state == SimulationState::Complete {
            return Ok(self.state);
        }

        self.ticks += 1;
        self.time = self.start_time + self.ticks as f64 * self.time_step;

        let environment = FlightEnvironment {
            atmosphere: &self.atmosphere,
            constants: &self.constants,
        };
        let leftover_time =
            self.head
                .update(self.time, self.time_step, &environment, &mut self.telemetry)?;
        debug!(
            "Tick {} at t={:.3}s, head leftover {:.3}s",
            self.ticks, self.time, leftover_time
        );

        if self.time >= self.time_max {
            self.state = SimulationState::Complete;
        }
        Ok(self.state)
    }

    /// Ticks until complete.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        info!(
            "Starting simulation: {} stage(s), time_max={}s, time_step={}s",
            self.head.chain_len(),
            self.time_max,
            self.time_step
        );

        while self.step()? == SimulationState::Running {}

        info!(
            "Simulation complete after {} tick(s) at t={:.3}s, head altitude {:.1}m",
            self.ticks,
            self.time,
            self.head.position().altitude()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        control::{environment::ConstantAtmosphere, launch_stages::StageParameters},
        trajectory_system::kinematics::KinematicState,
        utils::{position::Position, vector2d::Vector2D},
    };
    use std::f64::consts::FRAC_PI_2;

    fn create_test_stage(id: u32) -> Stage {
        let state = KinematicState::new(Position::cartesian(0.0, 0.0), Vector2D::ZERO, FRAC_PI_2);
        let parameters = StageParameters {
            lift_coefficient: 0.0,
            ..StageParameters::default()
        };
        Stage::new(id, parameters, 375_000.0, state).unwrap()
    }

    #[test]
    fn test_boundary_tick_is_included() {
        let mut simulation =
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, 10.0, 1.0).unwrap();
        simulation.run().unwrap();

        assert_eq!(simulation.state(), SimulationState::Complete);
        assert_eq!(simulation.ticks(), 10);
        assert_eq!(simulation.time(), 10.0);
        // Initial snapshot plus one record per tick.
        assert_eq!(simulation.telemetry().records().len(), 11);
    }

    #[test]
    fn test_uneven_step_overshoots_once() {
        let mut simulation =
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, 10.0, 3.0).unwrap();
        simulation.run().unwrap();

        let times: Vec<f64> = simulation
            .telemetry()
            .records()
            .iter()
            .map(|record| record.time)
            .collect();
        assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_fractional_step_does_not_drift() {
        let mut simulation =
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, 1.0, 0.1).unwrap();
        simulation.run().unwrap();
        assert_eq!(simulation.ticks(), 10);
    }

    #[test]
    fn test_step_after_completion_is_a_no_op() {
        let mut simulation =
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, 1.0, 1.0).unwrap();
        assert_eq!(simulation.step().unwrap(), SimulationState::Complete);
        let records = simulation.telemetry().records().len();

        assert_eq!(simulation.step().unwrap(), SimulationState::Complete);
        assert_eq!(simulation.telemetry().records().len(), records);
        assert_eq!(simulation.ticks(), 1);
    }

    #[test]
    fn test_zero_time_max_starts_complete() {
        let simulation =
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, 0.0, 1.0).unwrap();
        assert_eq!(simulation.state(), SimulationState::Complete);
    }

    #[test]
    fn test_invalid_time_parameters() {
        assert!(matches!(
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, 10.0, 0.0),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            FlightSimulation::new(create_test_stage(1), ConstantAtmosphere, f64::NAN, 1.0),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_stage_ids_are_rejected() {
        let head = create_test_stage(1).with_child(create_test_stage(1));
        assert!(matches!(
            FlightSimulation::new(head, ConstantAtmosphere, 10.0, 1.0),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }
}
