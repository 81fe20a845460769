//! Datum projection
//!
//! The datum is the last known position carried along the resultant drift
//! vector on a rhumb line.

use crate::algorithms::navigation::{normalize_bearing, rhumb_line_destination};
use crate::core::{nm_to_meters, Position};
use crate::utils::config::EarthModel;
use crate::validation::error::{SarResult, Violation};

pub struct DatumProjector {
    earth: EarthModel,
}

impl Default for DatumProjector {
    fn default() -> Self {
        Self::new(EarthModel::default())
    }
}

impl DatumProjector {
    pub fn new(earth: EarthModel) -> Self {
        Self { earth }
    }

    /// Project `start` along `bearing_deg` for `distance_nm`.
    ///
    /// The bearing may be any finite value and is normalized first. A zero
    /// distance returns `start` unchanged.
    pub fn project(&self, start: &Position, bearing_deg: f64, distance_nm: f64) -> SarResult<Position> {
        if !bearing_deg.is_finite() {
            return Err(Violation::NotFinite("bearing").into());
        }
        if !distance_nm.is_finite() {
            return Err(Violation::NotFinite("distance").into());
        }
        if distance_nm < 0.0 {
            return Err(Violation::NegativeDistance(distance_nm).into());
        }

        Ok(rhumb_line_destination(
            start,
            normalize_bearing(bearing_deg),
            nm_to_meters(distance_nm),
            self.earth.projection_radius_m,
        ))
    }
}
