use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_DENSITY_SEA_LEVEL, AIR_VISCOSITY_SEA_LEVEL, EARTH_RADIUS, GRAVITY, SEA_LEVEL_PRESSURE,
    SEA_LEVEL_TEMPERATURE, SPECIFIC_GAS_CONSTANT_AIR, TROPOSPHERE_HEIGHT,
    TROPOSPHERE_TEMP_GRADIENT,
};

const STRATOSPHERE_HEIGHT: f64 = 47_000.0; // m
const TROPOPAUSE_TEMPERATURE: f64 = 216.65; // K
const TROPOPAUSE_PRESSURE: f64 = 22_632.0; // Pa
const SCALE_RATE: f64 = 0.000157; // 1/m

/// Atmospheric conditions at one altitude, SI units (temperature in kelvin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereSample {
    pub density: f64,
    pub gravity: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub viscosity: f64,
}

/// Altitude -> conditions. Implementations must be pure: the same altitude
/// always yields the same sample.
pub trait Atmosphere {
    fn sample(&self, altitude: f64) -> AtmosphereSample;
}

/// Sea level conditions at 15°C, regardless of altitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantAtmosphere;

impl Atmosphere for ConstantAtmosphere {
    fn sample(&self, _altitude: f64) -> AtmosphereSample {
        AtmosphereSample {
            density: AIR_DENSITY_SEA_LEVEL,
            gravity: GRAVITY,
            pressure: SEA_LEVEL_PRESSURE,
            temperature: SEA_LEVEL_TEMPERATURE,
            viscosity: AIR_VISCOSITY_SEA_LEVEL,
        }
    }
}

/// Piecewise standard-atmosphere approximation up to the edge of space,
/// with inverse-square surface gravity.
#[derive(Debug, Clone, Copy)]
pub struct LayeredAtmosphere {
    pub surface_gravity: f64,
    pub body_radius: f64,
    pub atmosphere_height: f64,
}

impl Default for LayeredAtmosphere {
    fn default() -> Self {
        LayeredAtmosphere {
            surface_gravity: GRAVITY,
            body_radius: EARTH_RADIUS,
            atmosphere_height: 80_000.0,
        }
    }
}

impl LayeredAtmosphere {
    fn gravity_at_altitude(&self, altitude: f64) -> f64 {
        let distance = self.body_radius + altitude.max(0.0);
        self.surface_gravity * (self.body_radius / distance).powi(2)
    }

    fn temperature_and_pressure(&self, altitude: f64) -> (f64, f64) {
        let altitude = altitude.max(0.0);
        if altitude < TROPOSPHERE_HEIGHT {
            // Standard lapse rate
            let temperature = SEA_LEVEL_TEMPERATURE + TROPOSPHERE_TEMP_GRADIENT * altitude;
            let pressure =
                SEA_LEVEL_PRESSURE * (temperature / SEA_LEVEL_TEMPERATURE).powf(5.255);
            (temperature, pressure)
        } else if altitude < STRATOSPHERE_HEIGHT {
            let pressure = TROPOPAUSE_PRESSURE * (-SCALE_RATE * (altitude - TROPOSPHERE_HEIGHT)).exp();
            (TROPOPAUSE_TEMPERATURE, pressure)
        } else {
            // Pressure stays continuous across the stratopause
            let stratopause_pressure = TROPOPAUSE_PRESSURE
                * (-SCALE_RATE * (STRATOSPHERE_HEIGHT - TROPOSPHERE_HEIGHT)).exp();
            let pressure =
                stratopause_pressure * (-SCALE_RATE * (altitude - STRATOSPHERE_HEIGHT)).exp();
            (197.65, pressure)
        }
    }

    // Sutherland's law for air
    fn viscosity(temperature: f64) -> f64 {
        const SUTHERLAND: f64 = 110.4;
        AIR_VISCOSITY_SEA_LEVEL
            * (temperature / SEA_LEVEL_TEMPERATURE).powf(1.5)
            * (SEA_LEVEL_TEMPERATURE + SUTHERLAND)
            / (temperature + SUTHERLAND)
    }
}

impl Atmosphere for LayeredAtmosphere {
    fn sample(&self, altitude: f64) -> AtmosphereSample {
        let gravity = self.gravity_at_altitude(altitude);

        if altitude >= self.atmosphere_height {
            return AtmosphereSample {
                density: 0.0,
                gravity,
                pressure: 0.0,
                temperature: 2.7, // Cosmic microwave background temperature
                viscosity: 0.0,
            };
        }

        let (temperature, pressure) = self.temperature_and_pressure(altitude);
        let density = if pressure > 0.0 && temperature > 0.0 {
            pressure / (SPECIFIC_GAS_CONSTANT_AIR * temperature)
        } else {
            0.0
        };

        AtmosphereSample {
            density,
            gravity,
            pressure,
            temperature,
            viscosity: Self::viscosity(temperature),
        }
    }
}
