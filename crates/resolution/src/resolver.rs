//! KB3D resolver: runs detection, then the coordinated solvers or the violation escape.

use kb3d_core::Sign;
use kb3d_core::vector::{Vector3, horizontal, sub};
use kb3d_detection::{Detection, Detector, ProtectedVolume, VolumeError};
use log::debug;
use serde::Serialize;

use crate::coordination::{horizontal_coordination, vertical_coordination};
use crate::horizontal::{self, HorizontalSolution};
use crate::recovery::vertical_recovery;
use crate::vertical::vertical_speed;

/// Which path produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Preconditions not met; no candidate computed.
    Skipped,
    /// Coordinated maneuvers for a predicted conflict.
    Coordinated,
    /// Vertical escape from an ongoing violation.
    Recovery,
}

/// Coordination signs used for a coordinated resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coordination {
    pub vertical: Sign,
    pub horizontal: Sign,
}

/// Candidate ownship maneuvers. Each family is independent; `None` means that family cannot
/// resolve the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub mode: ResolutionMode,
    pub detection: Detection,
    pub coordination: Option<Coordination>,
    /// New ownship vertical speed, horizontal velocity unchanged.
    pub vertical_speed: Option<f64>,
    /// New ownship ground speed along the current track.
    pub ground_speed: Option<HorizontalSolution>,
    /// New ownship track at the current ground speed.
    pub track: Option<HorizontalSolution>,
    /// Combined track and ground speed change.
    pub optimal: Option<HorizontalSolution>,
}

impl Resolution {
    fn skipped(detection: Detection) -> Self {
        Self {
            mode: ResolutionMode::Skipped,
            detection,
            coordination: None,
            vertical_speed: None,
            ground_speed: None,
            track: None,
            optimal: None,
        }
    }

    pub fn has_candidate(&self) -> bool {
        self.vertical_speed.is_some()
            || self.ground_speed.is_some()
            || self.track.is_some()
            || self.optimal.is_some()
    }
}

/// Resolution engine bound to one protected volume and detection filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    detector: Detector,
}

impl Resolver {
    pub fn new(volume: ProtectedVolume) -> Self {
        Self {
            detector: Detector::new(volume),
        }
    }

    pub fn with_detector(detector: Detector) -> Self {
        Self { detector }
    }

    pub fn configure(&mut self, d: f64, h: f64, t: f64, filter: f64) -> Result<(), VolumeError> {
        self.detector.configure(d, h, t, filter)
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Resolve the encounter for the ownship.
    ///
    /// `s` is the ownship position relative to the intruder; `vo` and `vi` are the ownship and
    /// intruder velocities in the same frame.
    pub fn resolve(&self, s: &Vector3, vo: &Vector3, vi: &Vector3) -> Resolution {
        let v = sub(vo, vi);
        let detection = self.detector.detect(s, &v);
        let volume = self.detector.volume();

        if !detection.conflict {
            return Resolution::skipped(detection);
        }
        let Some(timing) = detection.timing else {
            return Resolution::skipped(detection);
        };

        if detection.violation {
            let escape_time = if timing.t_in.abs() > 0.0 {
                timing.t_in.abs()
            } else {
                timing.t_out
            };
            debug!("aircraft in violation, vertical recovery over {escape_time:.3}");
            return Resolution {
                mode: ResolutionMode::Recovery,
                vertical_speed: vertical_recovery(s, vo[2], vi[2], volume.h(), escape_time),
                ..Resolution::skipped(detection)
            };
        }

        let s2 = horizontal(s);
        let vo2 = horizontal(vo);
        let vi2 = horizontal(vi);
        if vo2 == [0.0, 0.0] || vi2 == [0.0, 0.0] {
            debug!("zero ground speed, resolution skipped");
            return Resolution::skipped(detection);
        }

        let coordination = Coordination {
            vertical: vertical_coordination(s, &v, timing.time2los),
            horizontal: horizontal_coordination(&s2, &horizontal(&v)),
        };
        let eps = coordination.horizontal;
        let d = volume.d();

        Resolution {
            mode: ResolutionMode::Coordinated,
            detection,
            coordination: Some(coordination),
            vertical_speed: vertical_speed(s, vo, vi, d, volume.h(), coordination.vertical),
            ground_speed: horizontal::ground_speed(&s2, &vo2, &vi2, d, eps),
            track: horizontal::track(&s2, &vo2, &vi2, d, eps),
            optimal: horizontal::optimal(&s2, &vo2, &vi2, d, eps),
        }
    }
}
