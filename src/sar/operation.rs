//! SAR operation orchestrator
//!
//! Drives drift, datum projection and search area construction for one case
//! record. Each invocation walks `Idle -> Validating -> Computing -> Complete`
//! or ends in `Failed`. Outputs are computed into a local value first and
//! stored on the record only when every step has succeeded, so a failed run
//! leaves the record exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algorithms::{
    DatumCircle, DatumProjector, DriftResult, DriftVectorCalculator, DriftWindow, SearchAreaBuilder,
};
use crate::core::{LeewayCoefficients, Position, WeatherSample};
use crate::sar::case::{
    DatumEstimate, DatumPointData, DatumPointOutputs, RapidResponseData, RapidResponseOutputs, SarCase, SarCaseType,
    TrackLineData, TrackLineOutputs,
};
use crate::utils::config::EngineConfig;
use crate::validation::data::{CaseValidator, ValidationConfig};
use crate::validation::error::{SarError, SarResult, Violation};

/// Stage of a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    Idle,
    Validating,
    Computing,
    Complete,
    Failed,
}

/// Outcome of one invocation with the states it passed through
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub state: OperationState,
    pub transitions: Vec<OperationState>,
    pub result: SarResult<()>,
}

impl Execution {
    pub fn is_complete(&self) -> bool {
        self.state == OperationState::Complete
    }
}

/// Records the state walk of one invocation
struct StateTrace<'a> {
    case_id: &'a str,
    states: Vec<OperationState>,
}

impl<'a> StateTrace<'a> {
    fn new(case_id: &'a str) -> Self {
        Self {
            case_id,
            states: vec![OperationState::Idle],
        }
    }

    fn enter(&mut self, state: OperationState) {
        debug!(case_id = self.case_id, ?state, "state transition");
        self.states.push(state);
    }

    fn finish(mut self, result: SarResult<()>) -> Execution {
        let state = match &result {
            Ok(()) => OperationState::Complete,
            Err(err) => {
                warn!(case_id = self.case_id, error = %err, "SAR calculation failed");
                OperationState::Failed
            }
        };
        self.enter(state);
        Execution {
            state,
            transitions: self.states,
            result,
        }
    }
}

/// Entry point of the SAR engine.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of threads working on distinct case records.
pub struct SarOperation {
    config: EngineConfig,
    validator: CaseValidator,
    drift: DriftVectorCalculator,
    projector: DatumProjector,
    area: SearchAreaBuilder,
}

impl Default for SarOperation {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl SarOperation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom configuration, rejected if it does not validate
    pub fn with_config(config: EngineConfig) -> SarResult<Self> {
        let validation = config.validate();
        if let Some(err) = validation.errors.into_iter().next() {
            return Err(SarError::Config(err.to_string()));
        }
        for w in &validation.warnings {
            warn!("{}", w);
        }
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let earth = config.earth_model;
        Self {
            validator: CaseValidator::with_config(ValidationConfig {
                max_elapsed_hours: config.max_elapsed_hours,
            }),
            drift: DriftVectorCalculator::new(earth),
            projector: DatumProjector::new(earth),
            area: SearchAreaBuilder::new(earth, config.drift_error_ratio),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the calculation for `case`, which must be of kind `case_type`
    pub fn run(&self, case_type: SarCaseType, case: &mut SarCase) -> SarResult<()> {
        self.execute(case_type, case).result
    }

    /// Like [`SarOperation::run`], also reporting the visited states
    pub fn execute(&self, case_type: SarCaseType, case: &mut SarCase) -> Execution {
        let case_id = case.case_id().to_owned();
        let mut trace = StateTrace::new(&case_id);

        trace.enter(OperationState::Validating);
        let actual = case.case_type();
        if actual != case_type {
            return trace.finish(Err(SarError::TypeMismatch {
                expected: case_type,
                actual,
            }));
        }
        if let Err(violation) = self.validator.validate(case) {
            return trace.finish(Err(SarError::InvalidInput(violation)));
        }

        trace.enter(OperationState::Computing);
        let result = match case {
            SarCase::RapidResponse(data) => self.rapid_response(data).map(|out| data.set_outputs(out)),
            SarCase::DatumPoint(data) => self.datum_point(data).map(|out| data.set_outputs(out)),
            SarCase::TrackLine(data) => self.track_line(data).map(|out| data.set_outputs(out)),
        };
        trace.finish(result)
    }

    fn rapid_response(&self, data: &RapidResponseData) -> SarResult<RapidResponseOutputs> {
        let window = data.drift_window();
        let drift = self
            .drift
            .compute_drift(&data.last_known_position, &data.weather_samples, &data.leeway, &window)?;
        let rdv = drift.rdv;
        let datum = self
            .projector
            .project(&data.last_known_position, rdv.direction_deg, rdv.distance_nm)?;
        let area = self.area.build_area(
            &datum,
            rdv.direction_deg,
            rdv.distance_nm,
            window.elapsed_hours(),
            data.safety_factor,
            &data.leeway,
        )?;

        debug!(
            case_id = %data.case_id,
            rdv_deg = rdv.direction_deg,
            rdv_nm = rdv.distance_nm,
            datum_lat = datum.lat(),
            datum_lon = datum.lon(),
            radius_nm = area.radius_nm,
            "rapid response computed"
        );

        ensure_finite(
            &[datum, area.a, area.b, area.c, area.d],
            &[rdv.direction_deg, rdv.distance_nm, rdv.speed_kt, area.radius_nm],
        )?;

        Ok(RapidResponseOutputs {
            datum,
            rdv,
            twcv: drift.twcv,
            leeway: drift.leeway,
            radius_nm: area.radius_nm,
            corner_a: area.a,
            corner_b: area.b,
            corner_c: area.c,
            corner_d: area.d,
        })
    }

    fn datum_point(&self, data: &DatumPointData) -> SarResult<DatumPointOutputs> {
        let window = data.drift_window();
        let run = |divergence: f64| {
            self.estimate(
                &data.last_known_position,
                &data.weather_samples,
                &data.leeway,
                &window,
                divergence,
                data.safety_factor,
            )
        };
        let downwind = run(0.0)?;
        let min = run(-data.leeway_divergence_deg)?;
        let max = run(data.leeway_divergence_deg)?;

        let circles = [min, downwind, max].map(|e| DatumCircle {
            center: e.datum,
            radius_nm: e.radius_nm,
        });
        let bx = self
            .area
            .enclose(&circles, &min.datum, &max.datum, downwind.rdv.direction_deg)?;

        for e in [&downwind, &min, &max] {
            ensure_estimate_finite(e)?;
        }
        ensure_finite(&[bx.a, bx.b, bx.c, bx.d], &[])?;

        debug!(case_id = %data.case_id, axis_deg = bx.axis_deg, "datum point computed");

        Ok(DatumPointOutputs {
            downwind,
            min,
            max,
            corner_a: bx.a,
            corner_b: bx.b,
            corner_c: bx.c,
            corner_d: bx.d,
        })
    }

    fn track_line(&self, data: &TrackLineData) -> SarResult<TrackLineOutputs> {
        let estimates = data
            .track_points
            .iter()
            .map(|point| {
                let window = DriftWindow::new(point.time, data.commence_search_time);
                self.estimate(
                    &point.position,
                    &data.weather_samples,
                    &data.leeway,
                    &window,
                    0.0,
                    data.safety_factor,
                )
            })
            .collect::<SarResult<Vec<_>>>()?;

        let (first, last) = match (estimates.first(), estimates.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(Violation::TrackTooShort(estimates.len()).into()),
        };
        let circles: Vec<DatumCircle> = estimates
            .iter()
            .map(|e| DatumCircle {
                center: e.datum,
                radius_nm: e.radius_nm,
            })
            .collect();
        let bx = self
            .area
            .enclose(&circles, &first.datum, &last.datum, first.rdv.direction_deg)?;

        for e in &estimates {
            ensure_estimate_finite(e)?;
        }
        ensure_finite(&[bx.a, bx.b, bx.c, bx.d], &[])?;

        debug!(
            case_id = %data.case_id,
            points = estimates.len(),
            axis_deg = bx.axis_deg,
            "track line computed"
        );

        Ok(TrackLineOutputs {
            estimates,
            corner_a: bx.a,
            corner_b: bx.b,
            corner_c: bx.c,
            corner_d: bx.d,
        })
    }

    /// Drift, datum and error radius for one starting position
    fn estimate(
        &self,
        origin: &Position,
        samples: &[WeatherSample],
        leeway: &LeewayCoefficients,
        window: &DriftWindow,
        divergence_deg: f64,
        safety_factor: f64,
    ) -> SarResult<DatumEstimate> {
        let DriftResult { rdv, .. } =
            self.drift
                .compute_drift_with_divergence(origin, samples, leeway, window, divergence_deg)?;
        let datum = self.projector.project(origin, rdv.direction_deg, rdv.distance_nm)?;
        let area = self.area.build_area(
            &datum,
            rdv.direction_deg,
            rdv.distance_nm,
            window.elapsed_hours(),
            safety_factor,
            leeway,
        )?;
        Ok(DatumEstimate {
            datum,
            rdv,
            radius_nm: area.radius_nm,
        })
    }
}

/// Reject results that degenerated on the way, e.g. a rhumb line from a pole
fn ensure_finite(positions: &[Position], values: &[f64]) -> SarResult<()> {
    if positions.iter().all(Position::is_valid) && values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Violation::NotFinite("computed output").into())
    }
}

fn ensure_estimate_finite(e: &DatumEstimate) -> SarResult<()> {
    ensure_finite(&[e.datum], &[e.rdv.direction_deg, e.rdv.distance_nm, e.rdv.speed_kt, e.radius_nm])
}
