//! Conflict detection against a protected cylinder centred on the intruder.
//!
//! The intruder sits at the origin; `s` and `v` are the ownship's position and velocity relative
//! to it. X points East, Y points North.

use kb3d_core::math::{sign, sq};
use kb3d_core::vector::Vector3;
use log::trace;
use serde::Serialize;

use crate::volume::{ProtectedVolume, VolumeError, validate_filter};

/// Timing of a loss-of-separation interval, relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossTiming {
    /// Entry into the protected volume (negative when already past).
    pub t_in: f64,
    /// Exit from the protected volume.
    pub t_out: f64,
    /// `max(t_in, 0)`.
    pub time2los: f64,
    /// Time to loss of horizontal separation, clamped at zero.
    pub time2lhs: f64,
    /// Time to loss of vertical separation, clamped at zero. `None` for level flight outside the
    /// vertical band, where vertical separation is never lost.
    pub time2lvs: Option<f64>,
    /// `t_out - time2los`.
    pub duration: f64,
}

/// Outcome of a single detection query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    /// Loss of separation predicted within the lookahead and longer than the filter.
    pub conflict: bool,
    /// Aircraft are inside the protected volume right now.
    pub violation: bool,
    /// `None` when the relative trajectory never produces a loss-of-separation interval.
    pub timing: Option<LossTiming>,
}

impl Detection {
    fn clear(violation: bool) -> Self {
        Self {
            conflict: false,
            violation,
            timing: None,
        }
    }
}

struct RawInterval {
    conflict: bool,
    t_in: f64,
    t_out: f64,
    theta1: f64,
    t1: Option<f64>,
}

/// CD3D detector: a protected volume plus a minimum-duration filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detector {
    volume: ProtectedVolume,
    filter: f64,
}

impl Detector {
    /// Detector without duration filtering.
    pub fn new(volume: ProtectedVolume) -> Self {
        Self {
            volume,
            filter: 0.0,
        }
    }

    /// Detector that suppresses conflicts whose duration does not exceed `filter`.
    pub fn with_filter(volume: ProtectedVolume, filter: f64) -> Result<Self, VolumeError> {
        Ok(Self {
            volume,
            filter: validate_filter(filter)?,
        })
    }

    /// Replace every parameter at once. Nothing changes when any value is rejected.
    pub fn configure(&mut self, d: f64, h: f64, t: f64, filter: f64) -> Result<(), VolumeError> {
        let volume = ProtectedVolume::new(d, h, t)?;
        self.filter = validate_filter(filter)?;
        self.volume = volume;
        Ok(())
    }

    pub fn set_filter(&mut self, filter: f64) -> Result<(), VolumeError> {
        self.filter = validate_filter(filter)?;
        Ok(())
    }

    pub fn filter(&self) -> f64 {
        self.filter
    }

    pub fn volume(&self) -> &ProtectedVolume {
        &self.volume
    }

    /// Whether the aircraft are inside the protected volume at time 0.
    pub fn is_violating(&self, s: &Vector3) -> bool {
        let [sx, sy, sz] = *s;
        sq(sx) + sq(sy) < sq(self.volume.d()) && sq(sz) < sq(self.volume.h())
    }

    /// Conflict detection with conflict interval.
    ///
    /// In violation, `time2los` is 0 and `duration` is the remaining time to exit. Conflicts are
    /// reported only if `t_in <= T`, `t_out > 0` and `duration > filter`.
    pub fn detect(&self, s: &Vector3, v: &Vector3) -> Detection {
        let violation = self.is_violating(s);
        let [sx, sy, _] = *s;
        let [vx, vy, _] = *v;

        let raw = if vx == 0.0 && vy == 0.0 && sq(sx) + sq(sy) < sq(self.volume.d()) {
            self.vertical_only(s, v)
        } else {
            self.crossing(s, v)
        };

        let Some(raw) = raw else {
            trace!("no loss-of-separation interval for s={s:?} v={v:?}");
            return Detection::clear(violation);
        };

        let time2los = raw.t_in.max(0.0);
        let duration = raw.t_out - time2los;
        let timing = LossTiming {
            t_in: raw.t_in,
            t_out: raw.t_out,
            time2los,
            time2lhs: raw.theta1.max(0.0),
            time2lvs: raw.t1.map(|t1| t1.max(0.0)),
            duration,
        };
        let conflict = raw.conflict
            && raw.t_in <= self.volume.t()
            && raw.t_out > 0.0
            && duration > self.filter;

        trace!(
            "interval [{:.3}, {:.3}] raw={} conflict={conflict} violation={violation}",
            raw.t_in, raw.t_out, raw.conflict
        );

        Detection {
            conflict,
            violation,
            timing: Some(timing),
        }
    }

    // No horizontal motion while horizontally inside: only the vertical crossing matters.
    fn vertical_only(&self, s: &Vector3, v: &Vector3) -> Option<RawInterval> {
        let (h, t) = (self.volume.h(), self.volume.t());
        let sz = s[2];
        let vz = v[2];

        let conflict =
            sq(sz) < sq(h) || (vz != 0.0 && vz * sz <= 0.0 && -h < sign(vz) * (t * vz + sz));
        if !conflict {
            return None;
        }

        if vz != 0.0 {
            let t1 = (-sign(vz) * h - sz) / vz;
            let t2 = (sign(vz) * h - sz) / vz;
            Some(RawInterval {
                conflict,
                t_in: t1,
                t_out: t2,
                theta1: 0.0,
                t1: Some(t1),
            })
        } else {
            Some(RawInterval {
                conflict,
                t_in: 0.0,
                t_out: t,
                theta1: 0.0,
                t1: Some(0.0),
            })
        }
    }

    fn crossing(&self, s: &Vector3, v: &Vector3) -> Option<RawInterval> {
        let (d_sep, h) = (self.volume.d(), self.volume.h());
        let [sx, sy, sz] = *s;
        let [vx, vy, vz] = *v;

        // Squared miss distance against D, scaled by |v|².
        let d = sq(d_sep) * (sq(vx) + sq(vy)) - sq(sx * vy - sy * vx);
        if d <= 0.0 {
            return None;
        }

        let a = sq(vx) + sq(vy);
        debug_assert!(a > 0.0, "positive discriminant implies horizontal motion");
        let b = sx * vx + sy * vy;
        let theta1 = (-b - d.sqrt()) / a;
        let theta2 = (-b + d.sqrt()) / a;

        if vz == 0.0 {
            let inside = sq(sz) < sq(h);
            return Some(RawInterval {
                conflict: inside,
                t_in: theta1,
                t_out: theta2,
                theta1,
                // Level: vertical separation is either already lost or never lost.
                t1: inside.then_some(0.0),
            });
        }

        let t1 = (-sign(vz) * h - sz) / vz;
        let t2 = (sign(vz) * h - sz) / vz;
        Some(RawInterval {
            conflict: theta1 < t2 && t1 < theta2,
            t_in: theta1.max(t1),
            t_out: theta2.min(t2),
            theta1,
            t1: Some(t1),
        })
    }
}
