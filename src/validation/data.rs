//! Input invariant checks for SAR case records

use crate::algorithms::DriftWindow;
use crate::core::{LeewayCoefficients, Position, WeatherSample};
use crate::sar::{DatumPointData, RapidResponseData, SarCase, TrackLineData};
use crate::validation::error::Violation;

/// Configuration for case validation
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Longest accepted drift window (hours)
    pub max_elapsed_hours: Option<f64>,
}

/// Checks a case record before any computation runs.
///
/// Reports the first violated invariant.
#[derive(Debug, Clone, Default)]
pub struct CaseValidator {
    config: ValidationConfig,
}

impl CaseValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, case: &SarCase) -> Result<(), Violation> {
        match case {
            SarCase::RapidResponse(d) => self.validate_rapid_response(d),
            SarCase::DatumPoint(d) => self.validate_datum_point(d),
            SarCase::TrackLine(d) => self.validate_track_line(d),
        }
    }

    pub fn validate_rapid_response(&self, data: &RapidResponseData) -> Result<(), Violation> {
        check_position(&data.last_known_position)?;
        self.check_window(&data.drift_window())?;
        check_samples(&data.weather_samples)?;
        check_leeway(&data.leeway)?;
        check_safety_factor(data.safety_factor)
    }

    pub fn validate_datum_point(&self, data: &DatumPointData) -> Result<(), Violation> {
        check_position(&data.last_known_position)?;
        self.check_window(&data.drift_window())?;
        check_samples(&data.weather_samples)?;
        check_leeway(&data.leeway)?;
        let div = data.leeway_divergence_deg;
        if !(0.0..90.0).contains(&div) {
            return Err(Violation::InvalidDivergence(div));
        }
        check_safety_factor(data.safety_factor)
    }

    pub fn validate_track_line(&self, data: &TrackLineData) -> Result<(), Violation> {
        let points = &data.track_points;
        if points.len() < 2 {
            return Err(Violation::TrackTooShort(points.len()));
        }
        for (index, point) in points.iter().enumerate() {
            check_position(&point.position)?;
            if index > 0 && point.time < points[index - 1].time {
                return Err(Violation::TrackOutOfOrder { index });
            }
            if point.time > data.commence_search_time {
                return Err(Violation::TrackPointAfterSearchStart { index });
            }
        }
        // the first point has the longest window
        self.check_window(&DriftWindow::new(points[0].time, data.commence_search_time))?;
        check_samples(&data.weather_samples)?;
        check_leeway(&data.leeway)?;
        check_safety_factor(data.safety_factor)
    }

    fn check_window(&self, window: &DriftWindow) -> Result<(), Violation> {
        let hours = window.elapsed_hours();
        if hours < 0.0 {
            return Err(Violation::NegativeElapsedTime { hours });
        }
        if let Some(limit) = self.config.max_elapsed_hours {
            if hours > limit {
                return Err(Violation::ElapsedTimeExceeded { hours, limit });
            }
        }
        Ok(())
    }
}

fn check_position(p: &Position) -> Result<(), Violation> {
    if p.is_valid() {
        Ok(())
    } else {
        Err(Violation::InvalidPosition { lat: p.lat(), lon: p.lon() })
    }
}

fn check_samples(samples: &[WeatherSample]) -> Result<(), Violation> {
    if samples.is_empty() {
        return Err(Violation::NoWeatherSamples);
    }
    for (index, s) in samples.iter().enumerate() {
        if index > 0 && s.timestamp < samples[index - 1].timestamp {
            return Err(Violation::SamplesOutOfOrder { index });
        }
        for (field, value) in [("wind direction", s.wind_direction_deg), ("current direction", s.current_direction_deg)] {
            if !(0.0..360.0).contains(&value) {
                return Err(Violation::SampleOutOfRange { index, field, value });
            }
        }
        for (field, value) in [("wind speed", s.wind_speed_kt), ("current speed", s.current_speed_kt)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Violation::SampleOutOfRange { index, field, value });
            }
        }
    }
    Ok(())
}

fn check_leeway(leeway: &LeewayCoefficients) -> Result<(), Violation> {
    if !leeway.x.is_finite() || leeway.x < 0.0 {
        return Err(Violation::InvalidLeewayCoefficient { name: "x", value: leeway.x });
    }
    // a negative offset is allowed, leeway speed is clamped at zero
    if !leeway.y.is_finite() {
        return Err(Violation::InvalidLeewayCoefficient { name: "y", value: leeway.y });
    }
    Ok(())
}

fn check_safety_factor(sf: f64) -> Result<(), Violation> {
    if sf.is_finite() && sf >= 1.0 {
        Ok(())
    } else {
        Err(Violation::SafetyFactorBelowOne(sf))
    }
}
