//! SAR case records and the calculation orchestrator

pub mod case;
pub mod operation;

pub use case::{
    DatumEstimate, DatumPointData, DatumPointOutputs, RapidResponseData, RapidResponseOutputs, SarCase, SarCaseType,
    TrackLineData, TrackLineOutputs, TrackPoint,
};
pub use operation::{Execution, OperationState, SarOperation};
