//! Drift vector computation
//!
//! Derives the Total Water Current Vector (TWCV) and the leeway vector from
//! an ordered weather sample history and composes them into the Resultant
//! Drift Vector (RDV). The elapsed window is split at every sample timestamp
//! that falls inside it; each piece is governed by the latest sample at or
//! before its start. For every piece the object is first set by the current
//! and then pushed downwind by leeway, both along great circles. The RDV is
//! the rhumb line from the origin to where that chain of legs ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::algorithms::navigation::{great_circle_destination, normalize_bearing, rhumb_line_bearing, rhumb_line_distance};
use crate::core::{meters_to_nm, nm_to_meters, DriftLeg, LeewayCoefficients, Position, ResultantDriftVector, WeatherSample, MILLIS_PER_HOUR};
use crate::utils::config::EarthModel;
use crate::validation::error::{SarError, SarResult, Violation};

/// Time window a drift is computed over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DriftWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window length in hours, negative if `end` precedes `start`
    pub fn elapsed_hours(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / MILLIS_PER_HOUR
    }
}

/// Output of a drift computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    pub rdv: ResultantDriftVector,
    /// Net effect of the water current alone
    pub twcv: DriftLeg,
    /// Net effect of leeway alone
    pub leeway: DriftLeg,
    /// Where the chained current and leeway legs end
    pub end_position: Position,
    /// Number of constant-weather pieces the window was split into
    pub segments: usize,
}

/// Piece of the drift window with constant weather
#[derive(Debug, Clone, Copy)]
struct Segment<'a> {
    sample: &'a WeatherSample,
    hours: f64,
}

pub struct DriftVectorCalculator {
    earth: EarthModel,
}

impl Default for DriftVectorCalculator {
    fn default() -> Self {
        Self::new(EarthModel::default())
    }
}

impl DriftVectorCalculator {
    pub fn new(earth: EarthModel) -> Self {
        Self { earth }
    }

    /// Drift with leeway acting straight downwind
    pub fn compute_drift(
        &self,
        origin: &Position,
        samples: &[WeatherSample],
        leeway: &LeewayCoefficients,
        window: &DriftWindow,
    ) -> SarResult<DriftResult> {
        self.compute_drift_with_divergence(origin, samples, leeway, window, 0.0)
    }

    /// Drift with the leeway direction rotated by `divergence_deg` from downwind
    /// (positive is clockwise)
    pub fn compute_drift_with_divergence(
        &self,
        origin: &Position,
        samples: &[WeatherSample],
        leeway: &LeewayCoefficients,
        window: &DriftWindow,
        divergence_deg: f64,
    ) -> SarResult<DriftResult> {
        if samples.is_empty() {
            return Err(SarError::InvalidInput(Violation::NoWeatherSamples));
        }
        if let Some(index) = (1..samples.len()).find(|&i| samples[i].timestamp < samples[i - 1].timestamp) {
            return Err(SarError::InvalidInput(Violation::SamplesOutOfOrder { index }));
        }
        let hours = window.elapsed_hours();
        if hours < 0.0 {
            return Err(SarError::InvalidInput(Violation::NegativeElapsedTime { hours }));
        }

        let radius = self.earth.projection_radius_m;
        let segments = Self::segments(samples, window);

        let mut position = *origin;
        let mut current_only = *origin;
        let mut leeway_only = *origin;

        for seg in &segments {
            let current_m = nm_to_meters(seg.sample.current_speed_kt * seg.hours);
            position = great_circle_destination(&position, seg.sample.current_direction_deg, current_m, radius);
            current_only = great_circle_destination(&current_only, seg.sample.current_direction_deg, current_m, radius);

            let leeway_dir = normalize_bearing(seg.sample.downwind_deg() + divergence_deg);
            let leeway_m = nm_to_meters(leeway.leeway_speed_kt(seg.sample.wind_speed_kt) * seg.hours);
            position = great_circle_destination(&position, leeway_dir, leeway_m, radius);
            leeway_only = great_circle_destination(&leeway_only, leeway_dir, leeway_m, radius);

            trace!(
                hours = seg.hours,
                current_dir = seg.sample.current_direction_deg,
                current_nm = meters_to_nm(current_m),
                leeway_dir,
                leeway_nm = meters_to_nm(leeway_m),
                "drift segment"
            );
        }

        let resultant = self.measure(origin, &position);
        let speed_kt = if hours > 0.0 { resultant.distance_nm / hours } else { 0.0 };

        Ok(DriftResult {
            rdv: ResultantDriftVector {
                direction_deg: resultant.direction_deg,
                distance_nm: resultant.distance_nm,
                speed_kt,
            },
            twcv: self.measure(origin, &current_only),
            leeway: self.measure(origin, &leeway_only),
            end_position: position,
            segments: segments.len(),
        })
    }

    /// Rhumb line bearing and distance between two positions
    fn measure(&self, from: &Position, to: &Position) -> DriftLeg {
        DriftLeg {
            direction_deg: rhumb_line_bearing(from, to),
            distance_nm: meters_to_nm(rhumb_line_distance(from, to, self.earth.measure_radius_m)),
        }
    }

    /// Split the window at sample timestamps; samples must be in time order
    fn segments<'a>(samples: &'a [WeatherSample], window: &DriftWindow) -> Vec<Segment<'a>> {
        let start = window.start.timestamp_millis();
        let end = window.end.timestamp_millis();
        if end <= start {
            return Vec::new();
        }

        let mut bounds = vec![start];
        for s in samples {
            let t = s.timestamp.timestamp_millis();
            if t > start && t < end && bounds.last() != Some(&t) {
                bounds.push(t);
            }
        }
        bounds.push(end);

        bounds
            .windows(2)
            .map(|w| {
                // the earliest sample also covers any gap before it
                let idx = samples.iter().rposition(|s| s.timestamp.timestamp_millis() <= w[0]).unwrap_or(0);
                Segment {
                    sample: &samples[idx],
                    hours: (w[1] - w[0]) as f64 / MILLIS_PER_HOUR,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn sample(at: DateTime<Utc>, wind_dir: f64, wind_kt: f64, current_dir: f64, current_kt: f64) -> WeatherSample {
        WeatherSample::new(at, wind_dir, wind_kt, current_dir, current_kt)
    }

    fn calm() -> LeewayCoefficients {
        LeewayCoefficients::new(0.0, 0.0)
    }

    #[test]
    fn test_empty_samples_rejected() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(1));
        let result = calc.compute_drift(&Position::new(61.0, -51.0), &[], &calm(), &window);
        assert_eq!(result, Err(SarError::InvalidInput(Violation::NoWeatherSamples)));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(2));
        let samples = vec![
            sample(t0() + Duration::hours(1), 0.0, 10.0, 90.0, 1.0),
            sample(t0(), 0.0, 10.0, 90.0, 1.0),
        ];
        let result = calc.compute_drift(&Position::new(61.0, -51.0), &samples, &calm(), &window);
        assert_eq!(result, Err(SarError::InvalidInput(Violation::SamplesOutOfOrder { index: 1 })));
    }

    #[test]
    fn test_negative_window_rejected() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() - Duration::minutes(30));
        let samples = vec![sample(t0(), 0.0, 10.0, 90.0, 1.0)];
        match calc.compute_drift(&Position::new(61.0, -51.0), &samples, &calm(), &window) {
            Err(SarError::InvalidInput(Violation::NegativeElapsedTime { hours })) => assert_eq!(hours, -0.5),
            other => panic!("expected NegativeElapsedTime, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_drift() {
        let calc = DriftVectorCalculator::default();
        let start = t0() - Duration::hours(1);
        let window = DriftWindow::new(start, t0());
        let samples = vec![sample(start, 30.0, 15.0, 45.0, 5.0)];
        let leeway = LeewayCoefficients::new(0.011, 0.068);

        let drift = calc.compute_drift(&Position::new(61.0, -51.0), &samples, &leeway, &window).unwrap();

        assert!((drift.rdv.direction_deg - 45.78003035557367).abs() < 1e-9);
        assert!((drift.rdv.distance_nm - 4.7754450213160355).abs() < 1e-9);
        assert_eq!(drift.rdv.distance_nm, drift.rdv.speed_kt);
        assert_eq!(drift.segments, 1);

        // current alone sets the object roughly 5 nm north-east
        assert!((drift.twcv.distance_nm - 5.0).abs() < 1e-3);
        assert!((drift.twcv.direction_deg - 45.05).abs() < 0.01);
        // 0.011 * 15 + 0.068 kt downwind of a wind from 030
        assert!((drift.leeway.distance_nm - 0.233).abs() < 1e-4);
        assert!((drift.leeway.direction_deg - 210.0).abs() < 0.01);
    }

    #[test]
    fn test_one_hour_speed_equals_distance() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(1));
        let samples = vec![sample(t0(), 300.0, 22.0, 170.0, 1.3)];
        let drift = calc
            .compute_drift(&Position::new(-33.5, 151.2), &samples, &LeewayCoefficients::new(0.03, 0.1), &window)
            .unwrap();
        assert_eq!(drift.rdv.distance_nm, drift.rdv.speed_kt);
    }

    #[test]
    fn test_deterministic() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::minutes(195));
        let samples = vec![
            sample(t0(), 250.0, 18.0, 10.0, 0.8),
            sample(t0() + Duration::hours(1), 260.0, 21.0, 20.0, 0.9),
            sample(t0() + Duration::hours(2), 275.0, 25.0, 35.0, 1.1),
        ];
        let leeway = LeewayCoefficients::new(0.011, 0.068);
        let origin = Position::new(55.7, 12.6);
        let a = calc.compute_drift(&origin, &samples, &leeway, &window).unwrap();
        let b = calc.compute_drift(&origin, &samples, &leeway, &window).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.segments, 3);
        assert!((a.rdv.speed_kt - a.rdv.distance_nm / 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_zero_window_has_no_drift() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0());
        let samples = vec![sample(t0(), 30.0, 15.0, 45.0, 5.0)];
        let origin = Position::new(61.0, -51.0);
        let drift = calc.compute_drift(&origin, &samples, &LeewayCoefficients::new(0.011, 0.068), &window).unwrap();
        assert_eq!(drift.rdv.distance_nm, 0.0);
        assert_eq!(drift.rdv.speed_kt, 0.0);
        assert_eq!(drift.end_position, origin);
        assert_eq!(drift.segments, 0);
    }

    #[test]
    fn test_current_only_along_meridian() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(3));
        let samples = vec![sample(t0(), 0.0, 0.0, 0.0, 2.0)];
        let drift = calc.compute_drift(&Position::new(10.0, 0.0), &samples, &calm(), &window).unwrap();
        assert_eq!(drift.rdv.direction_deg, 0.0);
        assert!((drift.rdv.distance_nm - 6.0).abs() < 1e-4);
        assert!((drift.rdv.speed_kt - 2.0).abs() < 1e-4);
        assert_eq!(drift.leeway.distance_nm, 0.0);
    }

    #[test]
    fn test_weather_change_inside_window() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(2));
        let samples = vec![
            sample(t0(), 0.0, 0.0, 90.0, 1.0),
            sample(t0() + Duration::hours(1), 0.0, 0.0, 0.0, 1.0),
        ];
        let drift = calc.compute_drift(&Position::new(20.0, -30.0), &samples, &calm(), &window).unwrap();
        assert_eq!(drift.segments, 2);
        assert!((drift.twcv.distance_nm - 2.0f64.sqrt()).abs() < 1e-3);
        assert!((drift.twcv.direction_deg - 45.0).abs() < 0.1);
    }

    #[test]
    fn test_samples_outside_window() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(1));
        let origin = Position::new(20.0, -30.0);

        // the sample in force at window start governs, later ones are ignored
        let samples = vec![
            sample(t0() - Duration::hours(2), 0.0, 0.0, 0.0, 3.0),
            sample(t0() - Duration::hours(1), 0.0, 0.0, 90.0, 1.0),
            sample(t0() + Duration::hours(5), 0.0, 0.0, 180.0, 40.0),
        ];
        let drift = calc.compute_drift(&origin, &samples, &calm(), &window).unwrap();
        assert_eq!(drift.segments, 1);
        assert!((drift.rdv.direction_deg - 90.0).abs() < 0.1);
        assert!((drift.rdv.distance_nm - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_first_sample_covers_leading_gap() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(2));
        let samples = vec![sample(t0() + Duration::minutes(30), 0.0, 0.0, 180.0, 1.5)];
        let drift = calc.compute_drift(&Position::new(20.0, -30.0), &samples, &calm(), &window).unwrap();
        assert_eq!(drift.segments, 2);
        assert!((drift.rdv.direction_deg - 180.0).abs() < 1e-6);
        assert!((drift.rdv.distance_nm - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_divergence_rotates_leeway() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(4));
        let samples = vec![sample(t0(), 0.0, 20.0, 0.0, 0.0)];
        let leeway = LeewayCoefficients::new(0.05, 0.0);
        let origin = Position::new(40.0, 5.0);

        let left = calc.compute_drift_with_divergence(&origin, &samples, &leeway, &window, -30.0).unwrap();
        let right = calc.compute_drift_with_divergence(&origin, &samples, &leeway, &window, 30.0).unwrap();
        assert!((left.leeway.direction_deg - 150.0).abs() < 0.1);
        assert!((right.leeway.direction_deg - 210.0).abs() < 0.1);
        assert!((left.rdv.distance_nm - 4.0).abs() < 1e-3);
        assert!((right.rdv.distance_nm - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_negative_leeway_speed_clamped() {
        let calc = DriftVectorCalculator::default();
        let window = DriftWindow::new(t0(), t0() + Duration::hours(1));
        let samples = vec![sample(t0(), 90.0, 2.0, 0.0, 0.0)];
        let drift = calc
            .compute_drift(&Position::new(0.0, 0.0), &samples, &LeewayCoefficients::new(0.01, -0.5), &window)
            .unwrap();
        assert_eq!(drift.rdv.distance_nm, 0.0);
        assert_eq!(drift.end_position, Position::new(0.0, 0.0));
    }
}
