//! Coordinate transformations needed to feed the detection and resolution engines.
//!
//! Angles are in radians, distances in metres. North latitudes and East longitudes are positive;
//! X points East, Y points North. The flat-Earth approximation degrades near the poles and at
//! large distances (fractional error of order `(distance / R)²`).

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kb3d_core::constants::{WGS84_A, WGS84_F};
use kb3d_core::math::{safe_asin, safe_atan2, sq};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeodesyError {
    #[error("latitude {0} rad is outside [-π/2, π/2]")]
    Latitude(f64),
    #[error("local frame cannot be anchored at a pole (latitude {0} rad)")]
    PolarOrigin(f64),
    #[error("non-finite coordinate")]
    NonFinite,
}

/// Great-circle central angle between two points (haversine form).
///
/// Multiply by an Earth radius for a distance, or by `60 · 180/π` for nautical miles.
pub fn gc_dist(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a = sq(((lat1 - lat2) / 2.0).sin())
        + lat1.cos() * lat2.cos() * sq(((lon1 - lon2) / 2.0).sin());
    2.0 * safe_asin(a.sqrt())
}

/// Initial true course from point 1 to point 2, in `[0, 2π)`.
pub fn true_course(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlon = lon2 - lon1;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let course = safe_atan2(y, x).rem_euclid(TAU);
    if course >= TAU { 0.0 } else { course }
}

fn wrap_pi(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

fn check_latitude(lat: f64) -> Result<f64, GeodesyError> {
    if !lat.is_finite() {
        return Err(GeodesyError::NonFinite);
    }
    if lat.abs() > FRAC_PI_2 {
        return Err(GeodesyError::Latitude(lat));
    }
    Ok(lat)
}

/// Local tangent-plane frame anchored at a reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    lat0: f64,
    lon0: f64,
    /// Metres per radian of latitude.
    meridional: f64,
    /// Metres per radian of longitude.
    parallel: f64,
}

impl LocalFrame {
    pub fn new(lat0: f64, lon0: f64) -> Result<Self, GeodesyError> {
        let lat0 = check_latitude(lat0)?;
        if !lon0.is_finite() {
            return Err(GeodesyError::NonFinite);
        }
        if lat0.abs() == FRAC_PI_2 {
            return Err(GeodesyError::PolarOrigin(lat0));
        }

        let e2 = WGS84_F * (2.0 - WGS84_F);
        let w = 1.0 - e2 * sq(lat0.sin());
        let meridional = WGS84_A * (1.0 - e2) / w.powf(1.5);
        let normal = WGS84_A / w.sqrt();

        Ok(Self {
            lat0,
            lon0,
            meridional,
            parallel: normal * lat0.cos(),
        })
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.lat0, self.lon0)
    }

    /// Project a geodetic point to `[east, north]` metres.
    pub fn to_xy(&self, lat: f64, lon: f64) -> Result<[f64; 2], GeodesyError> {
        let lat = check_latitude(lat)?;
        if !lon.is_finite() {
            return Err(GeodesyError::NonFinite);
        }
        Ok([
            self.parallel * wrap_pi(lon - self.lon0),
            self.meridional * (lat - self.lat0),
        ])
    }

    /// Inverse of [`LocalFrame::to_xy`]; longitude wrapped to `[-π, π)`.
    pub fn to_geo(&self, x: f64, y: f64) -> Result<(f64, f64), GeodesyError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeodesyError::NonFinite);
        }
        let lat = check_latitude(self.lat0 + y / self.meridional)?;
        let lon = wrap_pi(self.lon0 + x / self.parallel);
        Ok((lat, lon))
    }
}

/// Flat-Earth position of `(lat, lon)` relative to `(lat0, lon0)`, as `[east, north]` metres.
pub fn geo_to_xy(lat0: f64, lon0: f64, lat: f64, lon: f64) -> Result<[f64; 2], GeodesyError> {
    LocalFrame::new(lat0, lon0)?.to_xy(lat, lon)
}

/// Inverse of [`geo_to_xy`]: geodetic position of the flat-Earth point `[x, y]`.
pub fn xy_to_geo(lat0: f64, lon0: f64, x: f64, y: f64) -> Result<(f64, f64), GeodesyError> {
    LocalFrame::new(lat0, lon0)?.to_geo(x, y)
}
