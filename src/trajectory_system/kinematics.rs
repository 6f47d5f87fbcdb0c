use serde::Serialize;

use crate::utils::{position::Position, vector2d::Vector2D};

/// Translational state of a stage; `orientation` is the body angle α in
/// radians from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KinematicState {
    pub position: Position,
    pub velocity: Vector2D,
    pub orientation: f64,
}

impl KinematicState {
    pub fn new(position: Position, velocity: Vector2D, orientation: f64) -> Self {
        KinematicState {
            position,
            velocity,
            orientation,
        }
    }

    pub fn get_altitude(&self) -> f64 {
        self.position.altitude()
    }

    pub fn get_velocity_magnitude(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// One first-order step: velocity is updated from the net force first,
    /// then position moves with the new velocity.
    pub fn advance(&self, net_force: Vector2D, mass: f64, delta_time: f64) -> KinematicState {
        let acceleration = net_force / mass;
        let velocity = self.velocity + acceleration * delta_time;
        let position = self.position.translate(velocity * delta_time);

        KinematicState {
            position,
            velocity,
            orientation: self.orientation,
        }
    }
}

/// Mean of the mass at the start and end of a tick.
pub fn trapezoidal_mass(mass_before: f64, mass_after: f64) -> f64 {
    (mass_before + mass_after) / 2.0
}
