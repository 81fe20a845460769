//! Physical constants and engine parameters

/// Meters per international nautical mile
pub const METERS_PER_NM: f64 = 1852.0;

/// Radius of the sphere used to project drift legs and search area points (m)
pub const PROJECTION_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 mean earth radius used when measuring rhumb line distances (m)
pub const MEASURE_EARTH_RADIUS_M: f64 = 6_371_008.7714;

/// Share of the drift distance that is added to the datum error radius
pub const DRIFT_ERROR_RATIO: f64 = 0.3;

/// Milliseconds per hour, for converting timestamp differences
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[inline]
pub fn nm_to_meters(nm: f64) -> f64 {
    nm * METERS_PER_NM
}

#[inline]
pub fn meters_to_nm(m: f64) -> f64 {
    m / METERS_PER_NM
}
