use std::f64::consts::PI;

use serde::Serialize;

use super::{aerodynamics::Aerodynamics, kinematics::KinematicState};
use crate::{
    constants::PhysicalConstants,
    control::{environment::AtmosphereSample, propulsion::PropulsionSystem},
    errors::SimulationError,
    utils::vector2d::Vector2D,
};

/// Straight down in the flight plane.
const GRAVITY_DIRECTION: f64 = 3.0 * PI / 2.0;

/// The four forces acting on a stage during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ForceSet {
    pub drag: Vector2D,
    pub gravity: Vector2D,
    pub lift: Vector2D,
    pub thrust: Vector2D,
}

impl ForceSet {
    pub fn net(&self) -> Vector2D {
        self.drag + self.gravity + self.lift + self.thrust
    }
}

/// Inverse-square weight. Altitudes below the surface are treated as the
/// surface.
pub fn gravity_magnitude(total_mass: f64, altitude: f64, constants: &PhysicalConstants) -> f64 {
    constants.gravitational_constant * constants.body_mass * total_mass
        / (constants.body_radius + altitude.max(0.0)).powi(2)
}

/// Evaluates every force from the given state. Nothing is cached between
/// calls; the caller decides what to keep.
pub fn compute_forces(
    state: &KinematicState,
    total_mass: f64,
    aerodynamics: &Aerodynamics,
    propulsion: &PropulsionSystem,
    percent_thrust: f64,
    atmosphere: &AtmosphereSample,
    constants: &PhysicalConstants,
) -> Result<ForceSet, SimulationError> {
    let orientation = state.orientation;
    let thrust_magnitude = propulsion.thrust(percent_thrust, atmosphere.pressure)?;

    Ok(ForceSet {
        drag: aerodynamics.calculate_drag(state.velocity, orientation, atmosphere),
        gravity: Vector2D::from_polar(
            gravity_magnitude(total_mass, state.position.altitude(), constants),
            GRAVITY_DIRECTION,
        ),
        lift: aerodynamics.calculate_lift(state.velocity, orientation, atmosphere),
        thrust: Vector2D::from_polar(thrust_magnitude, orientation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::EARTH,
        control::environment::{Atmosphere, ConstantAtmosphere, LayeredAtmosphere},
        utils::position::Position,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    fn vertical_state(speed: f64) -> KinematicState {
        KinematicState::new(Position::cartesian(0.0, 0.0), Vector2D::new(0.0, speed), FRAC_PI_2)
    }

    fn test_engine() -> PropulsionSystem {
        PropulsionSystem::new(3000.0, 70_927.5, PI * 4.0, 1450.0)
    }

    #[test]
    fn test_gravity_points_down_with_inverse_square_magnitude() {
        let state = vertical_state(0.0);
        let aero = Aerodynamics::new(0.75, 0.0, PI * 4.0, 280.0);
        let atmosphere = ConstantAtmosphere.sample(0.0);

        let forces =
            compute_forces(&state, 1000.0, &aero, &test_engine(), 1.0, &atmosphere, &EARTH).unwrap();

        let expected = 6.674e-11 * 5.9722e24 * 1000.0 / 6.371e6_f64.powi(2);
        assert_relative_eq!(forces.gravity.magnitude(), expected, epsilon = 1e-9);
        assert_abs_diff_eq!(forces.gravity.x(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(forces.gravity.y(), -expected, epsilon = 1e-9);
    }

    #[test]
    fn test_gravity_weakens_with_altitude() {
        let ground = gravity_magnitude(1000.0, 0.0, &EARTH);
        let orbit = gravity_magnitude(1000.0, 400_000.0, &EARTH);
        assert!(orbit < ground);
    }

    #[test]
    fn test_gravity_below_surface_stays_finite() {
        let surface = gravity_magnitude(1000.0, 0.0, &EARTH);
        let buried = gravity_magnitude(1000.0, -EARTH.body_radius, &EARTH);

        assert!(buried.is_finite());
        assert_eq!(buried, surface);
    }

    #[test]
    fn test_vacuum_thrust_of_dry_stage_points_backwards() {
        let state = KinematicState::new(Position::cartesian(0.0, 100_000.0), Vector2D::ZERO, FRAC_PI_2);
        let aero = Aerodynamics::new(0.75, 0.0, PI * 4.0, 280.0);
        let atmosphere = LayeredAtmosphere::default().sample(100_000.0);

        let forces =
            compute_forces(&state, 25_000.0, &aero, &test_engine(), 0.0, &atmosphere, &EARTH).unwrap();

        // Only the nozzle pressure term is left and ambient pressure is zero.
        let expected = 70_927.5 * PI * 4.0;
        assert_relative_eq!(forces.thrust.r(), expected, epsilon = 1e-6);
        assert_relative_eq!(forces.thrust.theta(), FRAC_PI_2 + PI, epsilon = 1e-12);
        assert_relative_eq!(forces.thrust.y(), -expected, epsilon = 1e-6);
        assert_relative_eq!(
            forces.thrust.r(),
            (forces.thrust.x().powi(2) + forces.thrust.y().powi(2)).sqrt(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_thrust_follows_orientation() {
        let state = vertical_state(0.0);
        let aero = Aerodynamics::new(0.75, 0.0, PI * 4.0, 280.0);
        let atmosphere = ConstantAtmosphere.sample(0.0);

        let forces =
            compute_forces(&state, 1000.0, &aero, &test_engine(), 0.5, &atmosphere, &EARTH).unwrap();

        let expected = 0.5 * 1450.0 * 3000.0 + (101_325.0 - 70_927.5) * PI * 4.0;
        assert_abs_diff_eq!(forces.thrust.x(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(forces.thrust.y(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_net_force_is_vector_sum() {
        let state = vertical_state(250.0);
        let aero = Aerodynamics::new(0.75, 1.5, PI * 4.0, 280.0);
        let atmosphere = ConstantAtmosphere.sample(0.0);

        let forces =
            compute_forces(&state, 5000.0, &aero, &test_engine(), 1.0, &atmosphere, &EARTH).unwrap();
        let net = forces.net();

        let x = forces.drag.x() + forces.gravity.x() + forces.lift.x() + forces.thrust.x();
        let y = forces.drag.y() + forces.gravity.y() + forces.lift.y() + forces.thrust.y();
        assert_relative_eq!(net.x(), x, epsilon = 1e-6);
        assert_relative_eq!(net.y(), y, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_throttle_is_reported() {
        let state = vertical_state(0.0);
        let aero = Aerodynamics::new(0.75, 0.0, PI * 4.0, 280.0);
        let atmosphere = ConstantAtmosphere.sample(0.0);

        let result = compute_forces(&state, 1000.0, &aero, &test_engine(), 1.5, &atmosphere, &EARTH);
        assert!(matches!(result, Err(SimulationError::InvalidThrottle(_))));
    }
}
