//! Engine configuration

pub mod config;

pub use config::{ConfigError, EarthModel, EngineConfig, ValidationResult};
