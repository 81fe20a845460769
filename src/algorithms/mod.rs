//! Drift, datum and search area calculations

pub mod navigation;
pub mod drift;
pub mod datum;
pub mod search_area;

pub use drift::{DriftResult, DriftVectorCalculator, DriftWindow};
pub use datum::DatumProjector;
pub use search_area::{DatumCircle, SearchArea, SearchAreaBuilder, SearchBox};
