use std::fmt;

use serde::{Deserialize, Serialize};

use super::vector2d::Vector2D;

/// A point in the flight plane, kept in whichever form it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Position {
    Cartesian { x: f64, y: f64 },
    Spherical { r: f64, theta: f64 },
}

impl Position {
    pub fn cartesian(x: f64, y: f64) -> Self {
        Position::Cartesian { x, y }
    }

    pub fn spherical(r: f64, theta: f64) -> Self {
        Position::Spherical { r, theta }
    }

    pub fn altitude(&self) -> f64 {
        match *self {
            Position::Cartesian { y, .. } => y,
            Position::Spherical { r, theta } => r * theta.sin(),
        }
    }

    pub fn to_cartesian(&self) -> Self {
        match *self {
            Position::Cartesian { .. } => *self,
            Position::Spherical { r, theta } => Position::Cartesian {
                x: r * theta.cos(),
                y: r * theta.sin(),
            },
        }
    }

    pub fn to_spherical(&self) -> Self {
        match *self {
            Position::Cartesian { x, y } => Position::Spherical {
                r: (x.powi(2) + y.powi(2)).sqrt(),
                theta: y.atan2(x),
            },
            Position::Spherical { .. } => *self,
        }
    }

    /// The point as a displacement from the origin.
    pub fn as_vector(&self) -> Vector2D {
        match *self {
            Position::Cartesian { x, y } => Vector2D::new(x, y),
            Position::Spherical { r, theta } => Vector2D::from_polar(r, theta),
        }
    }

    /// Moves the point by `displacement`, keeping the current representation.
    pub fn translate(&self, displacement: Vector2D) -> Self {
        let moved = self.as_vector() + displacement;
        match self {
            Position::Cartesian { .. } => Position::Cartesian {
                x: moved.x(),
                y: moved.y(),
            },
            Position::Spherical { .. } => Position::Spherical {
                r: moved.r(),
                theta: moved.theta(),
            },
        }
    }

    pub fn x(&self) -> f64 {
        self.as_vector().x()
    }

    pub fn y(&self) -> f64 {
        self.as_vector().y()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::Cartesian { x: 0.0, y: 0.0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Cartesian { x, y } => write!(f, "({}, {})", x, y),
            Position::Spherical { r, theta } => write!(f, "({}, {})", r, theta),
        }
    }
}
