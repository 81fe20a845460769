use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{DRIFT_ERROR_RATIO, MEASURE_EARTH_RADIUS_M, PROJECTION_EARTH_RADIUS_M};

/// Engine-wide calculation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sphere radii used for projection and measurement
    pub earth_model: EarthModel,
    /// Share of the drift distance added to the datum error radius
    pub drift_error_ratio: f64,
    /// Longest accepted drift window (hours), unlimited when unset
    pub max_elapsed_hours: Option<f64>,
}

/// Spherical earth parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthModel {
    /// Radius for drift legs and position projection (meters)
    pub projection_radius_m: f64,
    /// Radius for rhumb-line distance measurement (meters)
    pub measure_radius_m: f64,
}

impl Default for EarthModel {
    fn default() -> Self {
        Self {
            projection_radius_m: PROJECTION_EARTH_RADIUS_M,
            measure_radius_m: MEASURE_EARTH_RADIUS_M,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            earth_model: EarthModel::default(),
            drift_error_ratio: DRIFT_ERROR_RATIO,
            max_elapsed_hours: None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl EngineConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        let config = Self::from_json_str(&content)?;
        debug!(path = %path.as_ref().display(), "engine configuration loaded");
        Ok(config)
    }

    /// Parse and validate a configuration from JSON text.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        let validation = config.validate();
        for w in &validation.warnings {
            warn!("{}", w);
        }
        match validation.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(config),
        }
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (name, value) in [
            ("earth_model.projection_radius_m", self.earth_model.projection_radius_m),
            ("earth_model.measure_radius_m", self.earth_model.measure_radius_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(ConfigError::InvalidParameter {
                    parameter: name.to_string(),
                    value: value.to_string(),
                    reason: "Earth radius must be a positive number of meters".to_string(),
                });
            } else if !(6_350_000.0..=6_390_000.0).contains(&value) {
                warnings.push(format!("{} = {} m is far from any terrestrial radius", name, value));
            }
        }

        if !self.drift_error_ratio.is_finite() || self.drift_error_ratio < 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "drift_error_ratio".to_string(),
                value: self.drift_error_ratio.to_string(),
                reason: "Drift error ratio must be zero or positive".to_string(),
            });
        } else if self.drift_error_ratio > 1.0 {
            warnings.push("Drift error ratio above 1.0 grows the search radius faster than the drift itself".to_string());
        }

        if let Some(limit) = self.max_elapsed_hours {
            if !limit.is_finite() || limit <= 0.0 {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "max_elapsed_hours".to_string(),
                    value: limit.to_string(),
                    reason: "Elapsed time limit must be positive".to_string(),
                });
            }
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
