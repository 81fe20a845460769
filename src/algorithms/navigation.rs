//! Spherical navigation primitives
//!
//! Drift legs are flown along great circles, while bearings and distances
//! between positions are measured along rhumb lines (loxodromes), which is
//! what a chart plotter shows for the short ranges involved in a search.
//! All functions are pure and take the sphere radius explicitly so the
//! projection and measuring radii can differ.

use nalgebra::Vector2;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::core::Position;

/// Below this isometric latitude difference a rhumb line is treated as east-west
const EAST_WEST_EPSILON: f64 = 1e-12;

/// Normalize a bearing into [0,360)
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let x = deg % 360.0;
    let x = if x < 0.0 { x + 360.0 } else { x };
    if x >= 360.0 { 0.0 } else { x }
}

/// Normalize a longitude into [-180,180]
#[inline]
pub fn normalize_longitude(deg: f64) -> f64 {
    if deg > 180.0 {
        deg - 360.0
    } else if deg < -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Difference of isometric (Mercator) latitudes between two latitudes in radians
#[inline]
fn isometric_delta(phi1: f64, phi2: f64) -> f64 {
    ((phi2 / 2.0 + FRAC_PI_4).tan() / (phi1 / 2.0 + FRAC_PI_4).tan()).ln()
}

/// Longitude difference in radians, taking the short way across the antimeridian
#[inline]
fn shortest_delta_lon(lon1_deg: f64, lon2_deg: f64) -> f64 {
    let d = (lon2_deg - lon1_deg).to_radians();
    if d.abs() > PI {
        if d > 0.0 { -(2.0 * PI - d) } else { 2.0 * PI + d }
    } else {
        d
    }
}

/// Destination reached by following a great circle from `start` with the given
/// initial bearing for `distance_m`
pub fn great_circle_destination(start: &Position, bearing_deg: f64, distance_m: f64, radius_m: f64) -> Position {
    if distance_m == 0.0 {
        return *start;
    }
    let delta = distance_m / radius_m;
    let theta = bearing_deg.to_radians();
    let phi1 = start.lat().to_radians();
    let lambda1 = start.lon().to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    Position::new(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// Destination reached by following a constant bearing from `start` for `distance_m`
pub fn rhumb_line_destination(start: &Position, bearing_deg: f64, distance_m: f64, radius_m: f64) -> Position {
    if distance_m == 0.0 {
        return *start;
    }
    let delta = distance_m / radius_m;
    let theta = bearing_deg.to_radians();
    let phi1 = start.lat().to_radians();
    let lambda1 = start.lon().to_radians();

    let delta_phi = delta * theta.cos();
    let mut phi2 = phi1 + delta_phi;
    // passing a pole continues down the other side, on the opposite meridian
    let over_pole = phi2.abs() > FRAC_PI_2;
    if over_pole {
        phi2 = if phi2 > 0.0 { PI - phi2 } else { -PI - phi2 };
    }

    let delta_psi = isometric_delta(phi1, phi2);
    let q = if delta_psi.abs() > EAST_WEST_EPSILON { delta_phi / delta_psi } else { phi1.cos() };
    let mut lambda2 = lambda1 + delta * theta.sin() / q;
    if over_pole {
        lambda2 += PI;
    }

    Position::new(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// Constant bearing (true, [0,360)) of the rhumb line from `from` to `to`
pub fn rhumb_line_bearing(from: &Position, to: &Position) -> f64 {
    let phi1 = from.lat().to_radians();
    let phi2 = to.lat().to_radians();
    let delta_lambda = shortest_delta_lon(from.lon(), to.lon());
    let delta_psi = isometric_delta(phi1, phi2);

    normalize_bearing(delta_lambda.atan2(delta_psi).to_degrees())
}

/// Length of the rhumb line from `from` to `to` in meters
pub fn rhumb_line_distance(from: &Position, to: &Position, radius_m: f64) -> f64 {
    let phi1 = from.lat().to_radians();
    let phi2 = to.lat().to_radians();
    let delta_phi = phi2 - phi1;
    let delta_psi = isometric_delta(phi1, phi2);
    let q = if delta_psi.abs() > EAST_WEST_EPSILON { delta_phi / delta_psi } else { phi1.cos() };
    let delta_lambda = shortest_delta_lon(from.lon(), to.lon());

    (delta_phi * delta_phi + q * q * delta_lambda * delta_lambda).sqrt() * radius_m
}

/// Offset of `to` relative to `from` in a local north/east tangent plane, in
/// the unit of `radius_m` scaled distance (meters)
pub fn local_offset(from: &Position, to: &Position, radius_m: f64) -> Vector2<f64> {
    let distance = rhumb_line_distance(from, to, radius_m);
    if distance == 0.0 {
        return Vector2::zeros();
    }
    let bearing = rhumb_line_bearing(from, to).to_radians();
    Vector2::new(distance * bearing.cos(), distance * bearing.sin())
}

/// Unit vector (north, east) for a true bearing
#[inline]
pub fn bearing_unit(bearing_deg: f64) -> Vector2<f64> {
    let theta = bearing_deg.to_radians();
    Vector2::new(theta.cos(), theta.sin())
}
