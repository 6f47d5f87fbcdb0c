use std::f64::consts::PI;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    environment::{Atmosphere, AtmosphereSample, ConstantAtmosphere},
    propulsion::{PropulsionSystem, Throttle},
};
use crate::{
    constants::{
        PhysicalConstants, DEFAULT_DRAG_COEFFICIENT, DEFAULT_LIFT_COEFFICIENT, EXHAUST_VELOCITY,
        REFERENCE_DRY_MASS, REFERENCE_EXHAUST_PRESSURE, REFERENCE_FLOW_RATE, REFERENCE_LENGTH,
        REFERENCE_WIDTH,
    },
    errors::SimulationError,
    telemetry_system::telemetry::{TelemetryRecord, TelemetrySink},
    trajectory_system::{
        aerodynamics::Aerodynamics,
        forces::{compute_forces, ForceSet},
        kinematics::{trapezoidal_mass, KinematicState},
    },
    utils::{position::Position, vector2d::Vector2D},
};

/// Geometry and engine constants, fixed for the life of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageParameters {
    pub length: f64,
    pub width: f64,
    pub exhaust_velocity: f64,
    pub exhaust_pressure: f64,
    pub flow_rate: f64,
    pub dry_mass: f64,
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
}

impl Default for StageParameters {
    fn default() -> Self {
        StageParameters {
            length: REFERENCE_LENGTH,
            width: REFERENCE_WIDTH,
            exhaust_velocity: EXHAUST_VELOCITY,
            exhaust_pressure: REFERENCE_EXHAUST_PRESSURE,
            flow_rate: REFERENCE_FLOW_RATE,
            dry_mass: REFERENCE_DRY_MASS,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            lift_coefficient: DEFAULT_LIFT_COEFFICIENT,
        }
    }
}

impl StageParameters {
    /// Circular cross-section of the body, also used as the nozzle exit area.
    pub fn exhaust_area(&self) -> f64 {
        PI * (self.width / 2.0).powi(2)
    }

    pub fn planform_area(&self) -> f64 {
        self.length * self.width
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let non_negative = [
            ("length", self.length),
            ("width", self.width),
            ("exhaust_velocity", self.exhaust_velocity),
            ("exhaust_pressure", self.exhaust_pressure),
            ("flow_rate", self.flow_rate),
            ("drag_coefficient", self.drag_coefficient),
            ("lift_coefficient", self.lift_coefficient),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.dry_mass.is_finite() || self.dry_mass <= 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "dry_mass must be positive, got {}",
                self.dry_mass
            )));
        }
        Ok(())
    }
}

/// One segment of the vehicle. A stage exclusively owns the stage stacked
/// below it, so a chain is a plain singly-linked list.
#[derive(Debug, Clone)]
pub struct Stage {
    id: u32,
    parameters: StageParameters,
    aerodynamics: Aerodynamics,
    propulsion: PropulsionSystem,
    fuel_mass: f64,
    state: KinematicState,
    atmosphere: AtmosphereSample,
    forces: ForceSet,
    burnout_time: Option<f64>,
    child: Option<Box<Stage>>,
}

/// Shared, read-only inputs of a tick.
#[derive(Clone, Copy)]
pub struct FlightEnvironment<'a> {
    pub atmosphere: &'a dyn Atmosphere,
    pub constants: &'a PhysicalConstants,
}

impl Stage {
    /// Builds a stage at rest in `state`. Its atmosphere sample starts from the
    /// constant model until [`Stage::sample_atmosphere`] is called.
    pub fn new(
        id: u32,
        parameters: StageParameters,
        fuel_mass: f64,
        state: KinematicState,
    ) -> Result<Self, SimulationError> {
        parameters.validate()?;
        if !fuel_mass.is_finite() || fuel_mass < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "fuel_mass must be a non-negative number, got {}",
                fuel_mass
            )));
        }

        let exhaust_area = parameters.exhaust_area();
        Ok(Stage {
            id,
            parameters,
            aerodynamics: Aerodynamics::new(
                parameters.drag_coefficient,
                parameters.lift_coefficient,
                exhaust_area,
                parameters.planform_area(),
            ),
            propulsion: PropulsionSystem::new(
                parameters.exhaust_velocity,
                parameters.exhaust_pressure,
                exhaust_area,
                parameters.flow_rate,
            ),
            fuel_mass,
            atmosphere: ConstantAtmosphere.sample(state.get_altitude()),
            state,
            forces: ForceSet::default(),
            burnout_time: None,
            child: None,
        })
    }

    pub fn with_child(mut self, child: Stage) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Stacks `child` below this stage, handing back whatever was there.
    pub fn attach_child(&mut self, child: Stage) -> Option<Stage> {
        self.child.replace(Box::new(child)).map(|previous| *previous)
    }

    /// Releases ownership of the stage below, if any.
    pub fn detach_child(&mut self) -> Option<Stage> {
        self.child.take().map(|child| *child)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn parameters(&self) -> &StageParameters {
        &self.parameters
    }

    pub fn fuel_mass(&self) -> f64 {
        self.fuel_mass
    }

    pub fn dry_mass(&self) -> f64 {
        self.parameters.dry_mass
    }

    /// Fuel plus structure of this stage and everything stacked below it.
    pub fn total_mass(&self) -> f64 {
        self.iter().map(|stage| stage.fuel_mass + stage.parameters.dry_mass).sum()
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.state.velocity
    }

    pub fn orientation(&self) -> f64 {
        self.state.orientation
    }

    pub fn forces(&self) -> &ForceSet {
        &self.forces
    }

    pub fn atmosphere(&self) -> &AtmosphereSample {
        &self.atmosphere
    }

    pub fn burnout_time(&self) -> Option<f64> {
        self.burnout_time
    }

    pub fn is_depleted(&self) -> bool {
        self.fuel_mass <= 0.0
    }

    pub fn child(&self) -> Option<&Stage> {
        self.child.as_deref()
    }

    /// Walks the chain from this stage down to the last one.
    pub fn iter(&self) -> StageIter<'_> {
        StageIter { next: Some(self) }
    }

    pub fn chain_len(&self) -> usize {
        self.iter().count()
    }

    pub fn find(&self, id: u32) -> Option<&Stage> {
        self.iter().find(|stage| stage.id == id)
    }

    /// Refreshes the atmosphere sample of every stage in the chain at its
    /// current altitude.
    pub fn sample_atmosphere(&mut self, atmosphere: &dyn Atmosphere) {
        self.atmosphere = atmosphere.sample(self.state.get_altitude());
        if let Some(child) = self.child.as_deref_mut() {
            child.sample_atmosphere(atmosphere);
        }
    }

    /// Advances this stage by `delta_time` and cascades into the stage below.
    ///
    /// Returns the part of the tick this stage could not sustain at full
    /// thrust. The stage below inherits this stage's post-integration
    /// kinematics, atmosphere and forces, then runs for that leftover time.
    ///
    /// Forces are computed from the atmosphere sample held by the stage, which
    /// starts at sea level. Call [`Stage::sample_atmosphere`] with the flight's
    /// model before the first update; [`FlightSimulation`] does this itself.
    ///
    /// [`FlightSimulation`]: crate::control::simulation::FlightSimulation
    pub fn update(
        &mut self,
        time: f64,
        delta_time: f64,
        environment: &FlightEnvironment<'_>,
        telemetry: &mut dyn TelemetrySink,
    ) -> Result<f64, SimulationError> {
        let leftover_time = if delta_time > 0.0 {
            self.integrate(time, delta_time, environment)?
        } else {
            0.0
        };

        telemetry.record(&TelemetryRecord::capture(self, time))?;

        let (state, atmosphere, forces) = (self.state, self.atmosphere, self.forces);
        if let Some(child) = self.child.as_deref_mut() {
            child.inherit(&state, atmosphere, forces);
            child.update(time, leftover_time, environment, telemetry)?;
        }

        Ok(leftover_time)
    }

    fn inherit(&mut self, parent: &KinematicState, atmosphere: AtmosphereSample, forces: ForceSet) {
        self.state.position = parent.position;
        self.state.velocity = parent.velocity;
        self.atmosphere = atmosphere;
        self.forces = forces;
    }

    fn integrate(
        &mut self,
        time: f64,
        delta_time: f64,
        environment: &FlightEnvironment<'_>,
    ) -> Result<f64, SimulationError> {
        let throttle =
            Throttle::for_burn(self.fuel_mass, self.propulsion.flow_rate, delta_time);
        let mass_before = self.total_mass();

        let forces = compute_forces(
            &self.state,
            mass_before,
            &self.aerodynamics,
            &self.propulsion,
            throttle.percent_thrust,
            &self.atmosphere,
            environment.constants,
        )?;

        let fuel_before = self.fuel_mass;
        let fuel_after = (fuel_before - self.propulsion.flow_rate * delta_time).max(0.0);
        let mass_after = mass_before - (fuel_before - fuel_after);

        self.state = self.state.advance(
            forces.net(),
            trapezoidal_mass(mass_before, mass_after),
            delta_time,
        );
        self.fuel_mass = fuel_after;
        self.forces = forces;
        self.atmosphere = environment.atmosphere.sample(self.state.get_altitude());

        if fuel_before > 0.0 && fuel_after <= 0.0 {
            self.burnout_time = Some(time);
            info!(
                "Stage {} burned out at t={:.2}s ({:.0}% of final tick under thrust)",
                self.id,
                time,
                throttle.percent_thrust * 100.0
            );
        }
        debug!(
            "Stage {} t={:.2}s alt={:.1}m speed={:.1}m/s fuel={:.1}kg throttle={:.3}",
            self.id,
            time,
            self.state.get_altitude(),
            self.state.get_velocity_magnitude(),
            self.fuel_mass,
            throttle.percent_thrust
        );

        Ok(throttle.leftover_time)
    }
}

pub struct StageIter<'a> {
    next: Option<&'a Stage>,
}

impl<'a> Iterator for StageIter<'a> {
    type Item = &'a Stage;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.child.as_deref();
        Some(current)
    }
}
