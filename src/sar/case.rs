//! SAR case records
//!
//! One record per case kind. Inputs are public fields owned by the caller;
//! computed outputs are private and only ever replaced as a whole by the
//! engine, so a record either has every output of its last successful run or
//! none at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algorithms::DriftWindow;
use crate::core::{DriftLeg, LeewayCoefficients, Position, ResultantDriftVector, WeatherSample};

/// Kind of SAR case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SarCaseType {
    /// Single last known position, quick box around one datum
    RapidResponse,
    /// Single last known position with leeway divergence bounds
    DatumPoint,
    /// Object lost somewhere along a known track
    TrackLine,
}

impl fmt::Display for SarCaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SarCaseType::RapidResponse => write!(f, "rapid response"),
            SarCaseType::DatumPoint => write!(f, "datum point"),
            SarCaseType::TrackLine => write!(f, "track line"),
        }
    }
}

/// Datum with the drift that produced it and its error radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatumEstimate {
    pub datum: Position,
    pub rdv: ResultantDriftVector,
    pub radius_nm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RapidResponseOutputs {
    pub datum: Position,
    pub rdv: ResultantDriftVector,
    /// Total water current vector
    pub twcv: DriftLeg,
    /// Leeway vector
    pub leeway: DriftLeg,
    pub radius_nm: f64,
    pub corner_a: Position,
    pub corner_b: Position,
    pub corner_c: Position,
    pub corner_d: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatumPointOutputs {
    /// Leeway straight downwind
    pub downwind: DatumEstimate,
    /// Leeway rotated anticlockwise by the divergence angle
    pub min: DatumEstimate,
    /// Leeway rotated clockwise by the divergence angle
    pub max: DatumEstimate,
    pub corner_a: Position,
    pub corner_b: Position,
    pub corner_c: Position,
    pub corner_d: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackLineOutputs {
    /// One estimate per track point, in track order
    pub estimates: Vec<DatumEstimate>,
    pub corner_a: Position,
    pub corner_b: Position,
    pub corner_c: Position,
    pub corner_d: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RapidResponseData {
    pub case_id: String,
    pub last_known_position_time: DateTime<Utc>,
    pub commence_search_time: DateTime<Utc>,
    pub last_known_position: Position,
    pub leeway: LeewayCoefficients,
    pub safety_factor: f64,
    /// Ordered by timestamp
    pub weather_samples: Vec<WeatherSample>,
    #[serde(default)]
    outputs: Option<RapidResponseOutputs>,
}

impl RapidResponseData {
    pub fn new(
        case_id: impl Into<String>,
        last_known_position_time: DateTime<Utc>,
        commence_search_time: DateTime<Utc>,
        last_known_position: Position,
        leeway: LeewayCoefficients,
        safety_factor: f64,
        weather_samples: Vec<WeatherSample>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            last_known_position_time,
            commence_search_time,
            last_known_position,
            leeway,
            safety_factor,
            weather_samples,
            outputs: None,
        }
    }

    pub fn drift_window(&self) -> DriftWindow {
        DriftWindow::new(self.last_known_position_time, self.commence_search_time)
    }

    /// Results of the last successful run
    pub fn outputs(&self) -> Option<&RapidResponseOutputs> {
        self.outputs.as_ref()
    }

    pub(crate) fn set_outputs(&mut self, outputs: RapidResponseOutputs) {
        self.outputs = Some(outputs);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumPointData {
    pub case_id: String,
    pub last_known_position_time: DateTime<Utc>,
    pub commence_search_time: DateTime<Utc>,
    pub last_known_position: Position,
    pub leeway: LeewayCoefficients,
    /// Half-angle of the leeway direction spread either side of downwind, [0,90)
    pub leeway_divergence_deg: f64,
    pub safety_factor: f64,
    pub weather_samples: Vec<WeatherSample>,
    #[serde(default)]
    outputs: Option<DatumPointOutputs>,
}

impl DatumPointData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        case_id: impl Into<String>,
        last_known_position_time: DateTime<Utc>,
        commence_search_time: DateTime<Utc>,
        last_known_position: Position,
        leeway: LeewayCoefficients,
        leeway_divergence_deg: f64,
        safety_factor: f64,
        weather_samples: Vec<WeatherSample>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            last_known_position_time,
            commence_search_time,
            last_known_position,
            leeway,
            leeway_divergence_deg,
            safety_factor,
            weather_samples,
            outputs: None,
        }
    }

    pub fn drift_window(&self) -> DriftWindow {
        DriftWindow::new(self.last_known_position_time, self.commence_search_time)
    }

    pub fn outputs(&self) -> Option<&DatumPointOutputs> {
        self.outputs.as_ref()
    }

    pub(crate) fn set_outputs(&mut self, outputs: DatumPointOutputs) {
        self.outputs = Some(outputs);
    }
}

/// Position the object was at (or is believed to have passed) at a given time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub position: Position,
    pub time: DateTime<Utc>,
}

impl TrackPoint {
    pub fn new(position: Position, time: DateTime<Utc>) -> Self {
        Self { position, time }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackLineData {
    pub case_id: String,
    /// At least two points, ordered by time
    pub track_points: Vec<TrackPoint>,
    pub commence_search_time: DateTime<Utc>,
    pub leeway: LeewayCoefficients,
    pub safety_factor: f64,
    pub weather_samples: Vec<WeatherSample>,
    #[serde(default)]
    outputs: Option<TrackLineOutputs>,
}

impl TrackLineData {
    pub fn new(
        case_id: impl Into<String>,
        track_points: Vec<TrackPoint>,
        commence_search_time: DateTime<Utc>,
        leeway: LeewayCoefficients,
        safety_factor: f64,
        weather_samples: Vec<WeatherSample>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            track_points,
            commence_search_time,
            leeway,
            safety_factor,
            weather_samples,
            outputs: None,
        }
    }

    pub fn outputs(&self) -> Option<&TrackLineOutputs> {
        self.outputs.as_ref()
    }

    pub(crate) fn set_outputs(&mut self, outputs: TrackLineOutputs) {
        self.outputs = Some(outputs);
    }
}

/// Case record tagged with its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "case_type", content = "data")]
pub enum SarCase {
    RapidResponse(RapidResponseData),
    DatumPoint(DatumPointData),
    TrackLine(TrackLineData),
}

impl SarCase {
    pub fn case_type(&self) -> SarCaseType {
        match self {
            SarCase::RapidResponse(_) => SarCaseType::RapidResponse,
            SarCase::DatumPoint(_) => SarCaseType::DatumPoint,
            SarCase::TrackLine(_) => SarCaseType::TrackLine,
        }
    }

    pub fn case_id(&self) -> &str {
        match self {
            SarCase::RapidResponse(d) => &d.case_id,
            SarCase::DatumPoint(d) => &d.case_id,
            SarCase::TrackLine(d) => &d.case_id,
        }
    }

    /// True once a run on this record has succeeded
    pub fn has_outputs(&self) -> bool {
        match self {
            SarCase::RapidResponse(d) => d.outputs.is_some(),
            SarCase::DatumPoint(d) => d.outputs.is_some(),
            SarCase::TrackLine(d) => d.outputs.is_some(),
        }
    }
}

impl From<RapidResponseData> for SarCase {
    fn from(data: RapidResponseData) -> Self {
        SarCase::RapidResponse(data)
    }
}

impl From<DatumPointData> for SarCase {
    fn from(data: DatumPointData) -> Self {
        SarCase::DatumPoint(data)
    }
}

impl From<TrackLineData> for SarCase {
    fn from(data: TrackLineData) -> Self {
        SarCase::TrackLine(data)
    }
}
