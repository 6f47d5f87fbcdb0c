use std::{f64::consts::FRAC_PI_2, fs, path::Path};

use serde::Deserialize;

use crate::{
    constants::{MAX_SIMULATION_TIME, REFERENCE_FUEL_MASS, TIME_STEP},
    control::launch_stages::{Stage, StageParameters},
    errors::SimulationError,
    trajectory_system::kinematics::KinematicState,
    utils::{position::Position, vector2d::Vector2D},
};

fn default_orientation() -> f64 {
    FRAC_PI_2
}

fn default_fuel_mass() -> f64 {
    REFERENCE_FUEL_MASS
}

fn default_time_max() -> f64 {
    MAX_SIMULATION_TIME
}

fn default_time_step() -> f64 {
    TIME_STEP
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageConfig {
    pub id: u32,
    #[serde(default)]
    pub parameters: StageParameters,
    #[serde(default = "default_fuel_mass")]
    pub fuel_mass: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub velocity: Vector2D,
    /// Body angle in radians; straight up by default.
    #[serde(default = "default_orientation")]
    pub orientation: f64,
}

impl StageConfig {
    pub fn build(&self) -> Result<Stage, SimulationError> {
        Stage::new(
            self.id,
            self.parameters,
            self.fuel_mass,
            KinematicState::new(self.position, self.velocity, self.orientation),
        )
    }
}

/// Run parameters plus the vehicle, listed head first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_time_max")]
    pub time_max: f64,
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    pub stages: Vec<StageConfig>,
}

impl Default for SimulationConfig {
    /// A two-stage vertical ascent from the origin.
    fn default() -> Self {
        let booster = StageParameters {
            flow_rate: 2_500.0,
            lift_coefficient: 0.0,
            ..StageParameters::default()
        };
        let upper = StageParameters {
            length: 14.0,
            width: 3.7,
            exhaust_velocity: 3_400.0,
            exhaust_pressure: 10_000.0,
            flow_rate: 290.0,
            dry_mass: 4_000.0,
            lift_coefficient: 0.0,
            ..StageParameters::default()
        };

        SimulationConfig {
            time_max: MAX_SIMULATION_TIME,
            time_step: TIME_STEP,
            stages: vec![
                StageConfig {
                    id: 1,
                    parameters: booster,
                    fuel_mass: REFERENCE_FUEL_MASS,
                    position: Position::default(),
                    velocity: Vector2D::ZERO,
                    orientation: FRAC_PI_2,
                },
                StageConfig {
                    id: 2,
                    parameters: upper,
                    fuel_mass: 92_000.0,
                    position: Position::default(),
                    velocity: Vector2D::ZERO,
                    orientation: FRAC_PI_2,
                },
            ],
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Nests every stage under the one listed before it and returns the head.
    pub fn build_chain(&self) -> Result<Stage, SimulationError> {
        let mut chain: Option<Stage> = None;
        for stage_config in self.stages.iter().rev() {
            let stage = stage_config.build()?;
            chain = Some(match chain {
                Some(child) => stage.with_child(child),
                None => stage,
            });
        }
        chain.ok_or_else(|| {
            SimulationError::InvalidConfiguration("at least one stage is required".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_two_stage_chain() {
        let config = SimulationConfig::default();
        let head = config.build_chain().unwrap();

        assert_eq!(head.chain_len(), 2);
        assert_eq!(head.id(), 1);
        assert_eq!(head.child().map(Stage::id), Some(2));
    }

    #[test]
    fn test_json_config_with_defaults() {
        let json = r#"{
            "time_max": 20.0,
            "stages": [
                { "id": 10, "fuel_mass": 500.0,
                  "position": { "kind": "cartesian", "x": 0.0, "y": 100.0 },
                  "velocity": { "r": 50.0, "theta": 1.5707963267948966 },
                  "parameters": { "flow_rate": 5.0, "dry_mass": 100.0 } },
                { "id": 11 }
            ]
        }"#;

        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.time_max, 20.0);
        assert_eq!(config.time_step, TIME_STEP);
        assert_eq!(config.stages[0].parameters.flow_rate, 5.0);
        assert_eq!(config.stages[0].parameters.length, StageParameters::default().length);
        assert_eq!(config.stages[1].fuel_mass, REFERENCE_FUEL_MASS);
        assert_eq!(config.stages[1].orientation, FRAC_PI_2);

        let head = config.build_chain().unwrap();
        assert_eq!(head.position().altitude(), 100.0);
        assert_eq!(head.velocity().r(), 50.0);
    }

    #[test]
    fn test_json_config_rejects_ambiguous_velocity() {
        let json = r#"{ "stages": [ { "id": 1, "velocity": { "x": 1.0, "r": 2.0 } } ] }"#;
        assert!(matches!(
            SimulationConfig::from_json_str(json),
            Err(SimulationError::Serialization(_))
        ));
    }

    #[test]
    fn test_empty_stage_list_is_rejected() {
        let config = SimulationConfig {
            stages: Vec::new(),
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.build_chain(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_stage_parameters_surface_from_build() {
        let json = r#"{ "stages": [ { "id": 1, "fuel_mass": -5.0 } ] }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert!(matches!(
            config.build_chain(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }
}
