// Physical Constants
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11; // m³/(kg⋅s²)
pub const EARTH_MASS: f64 = 5.9722e24; // kg
pub const EARTH_RADIUS: f64 = 6.371e6; // meters
pub const GRAVITY: f64 = 9.81; // m/s²

/// Constants shared by every force computation. Passed by reference so a
/// stage never carries its own copy of planetary data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    pub gravitational_constant: f64,
    pub body_mass: f64,
    pub body_radius: f64,
}

pub const EARTH: PhysicalConstants = PhysicalConstants {
    gravitational_constant: GRAVITATIONAL_CONSTANT,
    body_mass: EARTH_MASS,
    body_radius: EARTH_RADIUS,
};

impl Default for PhysicalConstants {
    fn default() -> Self {
        EARTH
    }
}

// Aerodynamic Constants
pub const DEFAULT_DRAG_COEFFICIENT: f64 = 0.75;
pub const DEFAULT_LIFT_COEFFICIENT: f64 = 1.5;

// Reference atmosphere (sea level, 15°C)
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0; // Pa
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15; // K
pub const AIR_VISCOSITY_SEA_LEVEL: f64 = 1.81e-5; // Pa⋅s
pub const TROPOSPHERE_TEMP_GRADIENT: f64 = -6.5 / 1_000.0; // K per meter
pub const TROPOSPHERE_HEIGHT: f64 = 11_000.0; // m
pub const SPECIFIC_GAS_CONSTANT_AIR: f64 = 287.05; // J/(kg⋅K)

// Reference stage (Falcon 9 first stage)
pub const REFERENCE_LENGTH: f64 = 70.0; // m
pub const REFERENCE_WIDTH: f64 = 4.0; // m
pub const REFERENCE_FUEL_MASS: f64 = 375_000.0; // kg
pub const REFERENCE_FLOW_RATE: f64 = 1_450.0; // kg/s
pub const REFERENCE_DRY_MASS: f64 = 25_000.0; // kg
pub const REFERENCE_EXHAUST_PRESSURE: f64 = 70_927.5; // Pa
pub const EXHAUST_VELOCITY: f64 = 3_000.0; // m/s

// Simulation Parameters
pub const TIME_STEP: f64 = 1.0; // s
pub const MAX_SIMULATION_TIME: f64 = 100.0; // s
