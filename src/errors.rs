use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid vector specification: {0}")]
    InvalidVectorSpec(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid throttle {0}: must be within [0, 1]")]
    InvalidThrottle(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
