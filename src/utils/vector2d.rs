use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;

/// A 2-D quantity holding both its cartesian and polar form.
///
/// Both forms are computed when the vector is built and never change
/// afterwards, so `x == r * cos(theta)` and `y == r * sin(theta)` hold for
/// every value (within floating-point tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorSpec", into = "VectorSpec")]
pub struct Vector2D {
    x: f64,
    y: f64,
    r: f64,
    theta: f64,
}

/// Loose constructor input: exactly one of the two coordinate pairs must be
/// fully present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
}

/// Right-hand side of [`Vector2D::try_mul`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Scalar(f64),
    Vector(Vector2D),
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D {
        x: 0.0,
        y: 0.0,
        r: 0.0,
        theta: 0.0,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D {
            x,
            y,
            r: (x.powi(2) + y.powi(2)).sqrt(),
            theta: y.atan2(x),
        }
    }

    /// A negative radius is stored as its magnitude pointing the other way,
    /// so `r` is never negative.
    pub fn from_polar(r: f64, theta: f64) -> Self {
        let (x, y) = (r * theta.cos(), r * theta.sin());
        if r < 0.0 {
            Vector2D {
                x,
                y,
                r: -r,
                theta: theta + PI,
            }
        } else {
            Vector2D { x, y, r, theta }
        }
    }

    pub fn from_spec(spec: VectorSpec) -> Result<Self, SimulationError> {
        let cartesian = spec.x.is_some() || spec.y.is_some();
        let polar = spec.r.is_some() || spec.theta.is_some();

        match (spec, cartesian, polar) {
            (_, true, true) => Err(SimulationError::InvalidVectorSpec(
                "cannot define a vector by both cartesian and polar coordinates".to_string(),
            )),
            (
                VectorSpec {
                    x: Some(x),
                    y: Some(y),
                    ..
                },
                true,
                false,
            ) => Ok(Vector2D::new(x, y)),
            (
                VectorSpec {
                    r: Some(r),
                    theta: Some(theta),
                    ..
                },
                false,
                true,
            ) => Ok(Vector2D::from_polar(r, theta)),
            _ => Err(SimulationError::InvalidVectorSpec(
                "define a vector by either x and y or r and theta".to_string(),
            )),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn magnitude(&self) -> f64 {
        self.r
    }

    pub fn scale(&self, k: f64) -> Self {
        Vector2D::new(self.x * k, self.y * k)
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(&self, other: &Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Multiplication accepting either operand kind. Only scalars are
    /// defined; products of two vectors go through `dot` or `cross`.
    pub fn try_mul(&self, rhs: Operand) -> Result<Self, SimulationError> {
        match rhs {
            Operand::Scalar(k) => Ok(self.scale(k)),
            Operand::Vector(_) => Err(SimulationError::UnsupportedOperation(
                "vector * vector is not defined, use dot() or cross()".to_string(),
            )),
        }
    }
}

impl TryFrom<VectorSpec> for Vector2D {
    type Error = SimulationError;

    fn try_from(spec: VectorSpec) -> Result<Self, Self::Error> {
        Vector2D::from_spec(spec)
    }
}

impl From<Vector2D> for VectorSpec {
    fn from(vector: Vector2D) -> Self {
        VectorSpec {
            x: Some(vector.x),
            y: Some(vector.y),
            r: None,
            theta: None,
        }
    }
}

impl From<f64> for Operand {
    fn from(k: f64) -> Self {
        Operand::Scalar(k)
    }
}

impl From<Vector2D> for Operand {
    fn from(vector: Vector2D) -> Self {
        Operand::Vector(vector)
    }
}

impl Default for Vector2D {
    fn default() -> Self {
        Vector2D::ZERO
    }
}

impl Sum for Vector2D {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Vector2D::ZERO, |a, b| a + b)
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, vector: Vector2D) -> Vector2D {
        vector.scale(self)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Vector2D::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Vector2D::new(-self.x, -self.y)
    }
}
