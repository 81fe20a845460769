//! Core data types for the drift engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geodetic position in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    lat: f64,
    lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// True if both coordinates are finite and inside [-90,90] x [-180,180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// One timestamped environmental observation.
///
/// `wind_direction_deg` is where the wind blows *from*, `current_direction_deg`
/// is where the current sets *towards*. Both are true bearings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub wind_direction_deg: f64,
    pub wind_speed_kt: f64,
    pub current_direction_deg: f64,
    pub current_speed_kt: f64,
}

impl WeatherSample {
    pub fn new(
        timestamp: DateTime<Utc>,
        wind_direction_deg: f64,
        wind_speed_kt: f64,
        current_direction_deg: f64,
        current_speed_kt: f64,
    ) -> Self {
        Self {
            timestamp,
            wind_direction_deg,
            wind_speed_kt,
            current_direction_deg,
            current_speed_kt,
        }
    }

    /// Direction the wind pushes a drifting object towards
    pub fn downwind_deg(&self) -> f64 {
        crate::algorithms::navigation::normalize_bearing(self.wind_direction_deg + 180.0)
    }
}

/// Empirical leeway model: speed = x * wind speed + y (knots)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeewayCoefficients {
    /// Downwind slope (kt of leeway per kt of wind)
    pub x: f64,
    /// Constant offset (kt)
    pub y: f64,
}

impl LeewayCoefficients {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Leeway speed for the given wind speed, never negative
    pub fn leeway_speed_kt(&self, wind_speed_kt: f64) -> f64 {
        (self.x * wind_speed_kt + self.y).max(0.0)
    }

    /// Fixed part of the datum error radius (nm)
    pub fn base_error_nm(&self) -> f64 {
        self.x + self.y
    }
}

/// Polar vector on the earth surface: true bearing plus distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftLeg {
    pub direction_deg: f64,
    pub distance_nm: f64,
}

/// Resultant drift vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultantDriftVector {
    pub direction_deg: f64,
    pub distance_nm: f64,
    pub speed_kt: f64,
}
