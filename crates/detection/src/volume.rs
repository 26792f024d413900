use serde::Serialize;
use thiserror::Error;

/// Errors raised when a protected volume or detection filter is configured inconsistently.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum VolumeError {
    #[error("horizontal separation must be positive (got {0})")]
    Horizontal(f64),
    #[error("vertical separation must be positive (got {0})")]
    Vertical(f64),
    #[error("lookahead time must be positive (got {0})")]
    Lookahead(f64),
    #[error("detection filter must be non-negative (got {0})")]
    Filter(f64),
}

/// Protected cylinder centred on the intruder plus the lookahead horizon.
///
/// Units are whatever the caller uses consistently for distance and time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProtectedVolume {
    d: f64,
    h: f64,
    t: f64,
}

impl ProtectedVolume {
    /// `d`: horizontal radius, `h`: vertical half-height, `t`: lookahead horizon.
    pub fn new(d: f64, h: f64, t: f64) -> Result<Self, VolumeError> {
        // `!(x > 0)` also rejects NaN.
        if !(d > 0.0) {
            return Err(VolumeError::Horizontal(d));
        }
        if !(h > 0.0) {
            return Err(VolumeError::Vertical(h));
        }
        if !(t > 0.0) {
            return Err(VolumeError::Lookahead(t));
        }
        Ok(Self { d, h, t })
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn t(&self) -> f64 {
        self.t
    }
}

pub(crate) fn validate_filter(filter: f64) -> Result<f64, VolumeError> {
    if filter >= 0.0 {
        Ok(filter)
    } else {
        Err(VolumeError::Filter(filter))
    }
}
