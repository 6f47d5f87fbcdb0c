pub mod environment;
pub mod launch_stages;
pub mod propulsion;
pub mod simulation;
