use thiserror::Error;

use crate::sar::SarCaseType;

pub type SarResult<T> = std::result::Result<T, SarError>;

/// Errors surfaced by the SAR engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SarError {
    #[error("invalid input: {0}")]
    InvalidInput(Violation),

    #[error("case type mismatch: requested {expected}, data is {actual}")]
    TypeMismatch { expected: SarCaseType, actual: SarCaseType },

    #[error("engine configuration rejected: {0}")]
    Config(String),
}

impl From<Violation> for SarError {
    fn from(v: Violation) -> Self {
        SarError::InvalidInput(v)
    }
}

/// The input invariant a request violated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("no weather samples")]
    NoWeatherSamples,

    #[error("weather sample {index} is earlier than the sample before it")]
    SamplesOutOfOrder { index: usize },

    #[error("weather sample {index}: {field} = {value} is out of range")]
    SampleOutOfRange { index: usize, field: &'static str, value: f64 },

    #[error("commence search time is {hours} h before the last known position time")]
    NegativeElapsedTime { hours: f64 },

    #[error("elapsed time {hours} h exceeds the configured limit of {limit} h")]
    ElapsedTimeExceeded { hours: f64, limit: f64 },

    #[error("safety factor {0} is below 1.0")]
    SafetyFactorBelowOne(f64),

    #[error("negative distance {0} nm")]
    NegativeDistance(f64),

    #[error("invalid position lat={lat} lon={lon}")]
    InvalidPosition { lat: f64, lon: f64 },

    #[error("invalid leeway coefficient {name} = {value}")]
    InvalidLeewayCoefficient { name: &'static str, value: f64 },

    #[error("leeway divergence {0} deg outside [0,90)")]
    InvalidDivergence(f64),

    #[error("track line needs at least 2 points, got {0}")]
    TrackTooShort(usize),

    #[error("track point {index} is earlier than the point before it")]
    TrackOutOfOrder { index: usize },

    #[error("track point {index} is after the commence search time")]
    TrackPointAfterSearchStart { index: usize },

    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
}
