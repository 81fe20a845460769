//! Search-and-rescue drift engine
//!
//! Computes where a drifting search object is most likely to be when a
//! search begins. Given a last known position, the time since then and a
//! history of wind and current observations, the engine derives the
//! resultant drift vector, projects the datum and bounds it with a search
//! area of four corners.
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use sar_drift::{LeewayCoefficients, Position, RapidResponseData, SarCase, SarCaseType, SarOperation, WeatherSample};
//!
//! let css = Utc::now();
//! let lkp_time = css - Duration::hours(1);
//! let mut case = SarCase::from(RapidResponseData::new(
//!     "case-1",
//!     lkp_time,
//!     css,
//!     Position::new(61.0, -51.0),
//!     LeewayCoefficients::new(0.011, 0.068),
//!     1.0,
//!     vec![WeatherSample::new(lkp_time, 30.0, 15.0, 45.0, 5.0)],
//! ));
//! SarOperation::new().run(SarCaseType::RapidResponse, &mut case)?;
//! # Ok::<(), sar_drift::SarError>(())
//! ```

pub mod core;
pub mod algorithms;
pub mod sar;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use core::{DriftLeg, LeewayCoefficients, Position, ResultantDriftVector, WeatherSample};
pub use algorithms::{DatumProjector, DriftResult, DriftVectorCalculator, DriftWindow, SearchArea, SearchAreaBuilder};
pub use sar::{
    DatumEstimate, DatumPointData, DatumPointOutputs, Execution, OperationState, RapidResponseData,
    RapidResponseOutputs, SarCase, SarCaseType, SarOperation, TrackLineData, TrackLineOutputs, TrackPoint,
};
pub use validation::{CaseValidator, SarError, SarResult, Violation};
pub use utils::{ConfigError, EarthModel, EngineConfig};
