//! Search area construction
//!
//! A search area is a box oriented along an axis bearing. Corners are named
//! relative to that axis: A forward-left, B forward-right, C aft-right,
//! D aft-left. The edges are laid out from the box centre along great
//! circles, first along the axis and then square to it.
//!
//! The datum error radius grows with the drift distance:
//! `radius = (x + y + drift_error_ratio * rdv_distance) * safety_factor`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::navigation::{
    bearing_unit, great_circle_destination, local_offset, normalize_bearing, rhumb_line_bearing, rhumb_line_destination,
    rhumb_line_distance,
};
use crate::core::{nm_to_meters, LeewayCoefficients, Position, DRIFT_ERROR_RATIO};
use crate::utils::config::EarthModel;
use crate::validation::error::{SarResult, Violation};

/// Four-cornered search area around a single datum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchArea {
    pub radius_nm: f64,
    pub a: Position,
    pub b: Position,
    pub c: Position,
    pub d: Position,
}

/// Datum with its error radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatumCircle {
    pub center: Position,
    pub radius_nm: f64,
}

/// Box enclosing several datum circles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBox {
    /// Bearing of the forward direction
    pub axis_deg: f64,
    pub center: Position,
    pub a: Position,
    pub b: Position,
    pub c: Position,
    pub d: Position,
}

/// Distances from the box centre to each edge (nm)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extents {
    forward: f64,
    aft: f64,
    left: f64,
    right: f64,
}

pub struct SearchAreaBuilder {
    earth: EarthModel,
    drift_error_ratio: f64,
}

impl Default for SearchAreaBuilder {
    fn default() -> Self {
        Self::new(EarthModel::default(), DRIFT_ERROR_RATIO)
    }
}

impl SearchAreaBuilder {
    pub fn new(earth: EarthModel, drift_error_ratio: f64) -> Self {
        Self { earth, drift_error_ratio }
    }

    /// Datum error radius in nautical miles
    pub fn radius_nm(&self, leeway: &LeewayCoefficients, rdv_distance_nm: f64, safety_factor: f64) -> f64 {
        (leeway.base_error_nm() + self.drift_error_ratio * rdv_distance_nm) * safety_factor
    }

    /// Square search area of half-width `radius` centred on the datum and
    /// aligned with the drift direction.
    ///
    /// `elapsed_hours` enters only through the drift distance, so the radius is
    /// non-decreasing in elapsed time and in `safety_factor`.
    pub fn build_area(
        &self,
        datum: &Position,
        rdv_bearing_deg: f64,
        rdv_distance_nm: f64,
        elapsed_hours: f64,
        safety_factor: f64,
        leeway: &LeewayCoefficients,
    ) -> SarResult<SearchArea> {
        if !rdv_bearing_deg.is_finite() {
            return Err(Violation::NotFinite("rdv bearing").into());
        }
        if !rdv_distance_nm.is_finite() {
            return Err(Violation::NotFinite("rdv distance").into());
        }
        if rdv_distance_nm < 0.0 {
            return Err(Violation::NegativeDistance(rdv_distance_nm).into());
        }
        if !elapsed_hours.is_finite() {
            return Err(Violation::NotFinite("elapsed hours").into());
        }
        if elapsed_hours < 0.0 {
            return Err(Violation::NegativeElapsedTime { hours: elapsed_hours }.into());
        }
        if !(safety_factor.is_finite() && safety_factor >= 1.0) {
            return Err(Violation::SafetyFactorBelowOne(safety_factor).into());
        }

        let radius_nm = self.radius_nm(leeway, rdv_distance_nm, safety_factor);
        let extents = Extents {
            forward: radius_nm,
            aft: radius_nm,
            left: radius_nm,
            right: radius_nm,
        };
        let [a, b, c, d] = self.place_corners(datum, normalize_bearing(rdv_bearing_deg), &extents);
        debug!(radius_nm, "search area built");

        Ok(SearchArea { radius_nm, a, b, c, d })
    }

    /// Smallest box oriented along `from -> to` that contains every circle.
    ///
    /// The box is centred on the rhumb-line midpoint of `from` and `to`. When
    /// the two coincide `fallback_axis_deg` orients the box instead.
    pub fn enclose(
        &self,
        circles: &[DatumCircle],
        from: &Position,
        to: &Position,
        fallback_axis_deg: f64,
    ) -> SarResult<SearchBox> {
        if circles.is_empty() {
            return Err(Violation::TrackTooShort(0).into());
        }
        if let Some(bad) = circles.iter().find(|c| !c.radius_nm.is_finite() || c.radius_nm < 0.0) {
            return Err(Violation::NegativeDistance(bad.radius_nm).into());
        }

        let radius_m = self.earth.projection_radius_m;
        let span_m = rhumb_line_distance(from, to, radius_m);
        let (axis_deg, center) = if span_m > 0.0 {
            let axis = rhumb_line_bearing(from, to);
            (axis, rhumb_line_destination(from, axis, span_m / 2.0, radius_m))
        } else {
            (normalize_bearing(fallback_axis_deg), *from)
        };

        let along = bearing_unit(axis_deg);
        let across = bearing_unit(axis_deg + 90.0);
        let mut extents = Extents {
            forward: 0.0,
            aft: 0.0,
            left: 0.0,
            right: 0.0,
        };
        for circle in circles {
            let offset = local_offset(&center, &circle.center, radius_m) / nm_to_meters(1.0);
            let fwd = offset.dot(&along);
            let side = offset.dot(&across);
            extents.forward = extents.forward.max(fwd + circle.radius_nm);
            extents.aft = extents.aft.max(circle.radius_nm - fwd);
            extents.right = extents.right.max(side + circle.radius_nm);
            extents.left = extents.left.max(circle.radius_nm - side);
        }

        let [a, b, c, d] = self.place_corners(&center, axis_deg, &extents);
        debug!(
            axis_deg,
            forward = extents.forward,
            aft = extents.aft,
            left = extents.left,
            right = extents.right,
            "enclosing box built"
        );

        Ok(SearchBox { axis_deg, center, a, b, c, d })
    }

    fn place_corners(&self, center: &Position, axis_deg: f64, ext: &Extents) -> [Position; 4] {
        let r = self.earth.projection_radius_m;
        let left = normalize_bearing(axis_deg - 90.0);
        let right = normalize_bearing(axis_deg + 90.0);

        let fwd = great_circle_destination(center, axis_deg, nm_to_meters(ext.forward), r);
        let aft = great_circle_destination(center, normalize_bearing(axis_deg + 180.0), nm_to_meters(ext.aft), r);

        [
            great_circle_destination(&fwd, left, nm_to_meters(ext.left), r),
            great_circle_destination(&fwd, right, nm_to_meters(ext.right), r),
            great_circle_destination(&aft, right, nm_to_meters(ext.right), r),
            great_circle_destination(&aft, left, nm_to_meters(ext.left), r),
        ]
    }
}

/// Rhumb-line distance between two positions in nm, on the projection sphere
#[cfg(test)]
pub(crate) fn separation_nm(earth: &EarthModel, from: &Position, to: &Position) -> f64 {
    crate::core::meters_to_nm(rhumb_line_distance(from, to, earth.projection_radius_m))
}
