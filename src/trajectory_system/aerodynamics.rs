use std::f64::consts::{FRAC_PI_2, PI};

use crate::{control::environment::AtmosphereSample, utils::vector2d::Vector2D};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aerodynamics {
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
    pub frontal_area: f64,
    pub planform_area: f64,
}

impl Aerodynamics {
    pub fn new(
        drag_coefficient: f64,
        lift_coefficient: f64,
        frontal_area: f64,
        planform_area: f64,
    ) -> Self {
        Aerodynamics {
            drag_coefficient,
            lift_coefficient,
            frontal_area,
            planform_area,
        }
    }

    /// Drag acts against the orientation, `Cd * q * A_frontal`.
    pub fn calculate_drag(
        &self,
        velocity: Vector2D,
        orientation: f64,
        atmosphere: &AtmosphereSample,
    ) -> Vector2D {
        let drag_magnitude = self.drag_coefficient
            * self.calculate_dynamic_pressure(velocity, atmosphere)
            * self.frontal_area;
        Vector2D::from_polar(drag_magnitude, orientation + PI)
    }

    /// Lift acts perpendicular to the orientation, `Cl * q * A_planform`.
    pub fn calculate_lift(
        &self,
        velocity: Vector2D,
        orientation: f64,
        atmosphere: &AtmosphereSample,
    ) -> Vector2D {
        let lift_magnitude = self.lift_coefficient
            * self.calculate_dynamic_pressure(velocity, atmosphere)
            * self.planform_area;
        Vector2D::from_polar(lift_magnitude, orientation + FRAC_PI_2)
    }

    fn calculate_dynamic_pressure(&self, velocity: Vector2D, atmosphere: &AtmosphereSample) -> f64 {
        0.5 * atmosphere.density * velocity.magnitude().powi(2)
    }
}
