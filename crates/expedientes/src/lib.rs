pub mod cases;
pub mod config;
pub mod error;
pub mod telemetry;
