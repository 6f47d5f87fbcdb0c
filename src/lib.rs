pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use config::{SimulationConfig, StageConfig};
pub use constants::*;
pub use control::environment::{Atmosphere, AtmosphereSample, ConstantAtmosphere, LayeredAtmosphere};
pub use control::launch_stages::{FlightEnvironment, Stage, StageParameters};
pub use control::propulsion::{PropulsionSystem, Throttle};
pub use control::simulation::{FlightSimulation, SimulationState};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::Aerodynamics;
pub use trajectory_system::forces::{compute_forces, ForceSet};
pub use trajectory_system::kinematics::KinematicState;

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{
    CsvTelemetry, FlightLog, FlightSummary, TelemetryRecord, TelemetrySink,
};

// Re-export commonly used utilities
pub use utils::position::Position;
pub use utils::vector2d::{Operand, Vector2D, VectorSpec};
