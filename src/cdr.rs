//! Conflict detection and resolution façade working in aviation units.
//!
//! Aircraft state is given as latitude/longitude (deg), altitude (ft), track (deg, true north
//! clockwise), ground speed (knots), and vertical speed (ft/min). The engines run in metres and
//! seconds with the traffic aircraft at the origin; results come back in the caller's units.

use kb3d_config::{AircraftConfig, EncounterConfig, SeparationConfig};
use kb3d_core::units::{
    fpm_to_ms, ft_to_m, knots_to_ms, m_to_ft, ms_to_fpm, ms_to_knots, nm_to_m, normalize_deg,
};
use kb3d_core::vector::{Vector3, add, scale, sub};
use kb3d_detection::{Detection, Detector, ProtectedVolume, VolumeError};
use kb3d_export::summary;
use kb3d_geodesy::{GeodesyError, LocalFrame, gc_dist, true_course};
use kb3d_resolution::{HorizontalSolution, Resolution, ResolutionMode, Resolver};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced while setting up an encounter.
#[derive(Debug, Error)]
pub enum CdrError {
    #[error("invalid protected volume: {0}")]
    Volume(#[from] VolumeError),
    #[error("invalid aircraft position: {0}")]
    Geodesy(#[from] GeodesyError),
}

/// Aircraft state in aviation units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AircraftState {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_ft: f64,
    pub trk_deg: f64,
    pub gs_kn: f64,
    pub vs_fpm: f64,
}

impl AircraftState {
    /// Velocity in m/s, X East, Y North, Z up.
    pub fn velocity_ms(&self) -> Vector3 {
        let gs = knots_to_ms(self.gs_kn);
        let trk = self.trk_deg.to_radians();
        [gs * trk.sin(), gs * trk.cos(), fpm_to_ms(self.vs_fpm)]
    }
}

impl From<&AircraftConfig> for AircraftState {
    fn from(config: &AircraftConfig) -> Self {
        Self {
            lat_deg: config.lat_deg,
            lon_deg: config.lon_deg,
            alt_ft: config.alt_ft,
            trk_deg: config.trk_deg,
            gs_kn: config.gs_kn,
            vs_fpm: config.vs_fpm,
        }
    }
}

/// Geodetic point with altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_ft: f64,
}

/// Projected positions of both aircraft at loss-of-separation entry and exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConflictLocations {
    pub ownship_entry: GeoPoint,
    pub ownship_exit: GeoPoint,
    pub traffic_entry: GeoPoint,
    pub traffic_exit: GeoPoint,
}

/// Combined track and ground speed advisory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalAdvisory {
    pub track_deg: f64,
    pub ground_speed_kn: f64,
}

/// Resolution expressed in aviation units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Advisory {
    pub mode: ResolutionMode,
    pub vertical_speed_fpm: Option<f64>,
    pub ground_speed_kn: Option<f64>,
    pub track_deg: Option<f64>,
    pub optimal: Option<OptimalAdvisory>,
}

fn track_deg(solution: &HorizontalSolution) -> f64 {
    normalize_deg(solution.track().to_degrees())
}

impl From<&Resolution> for Advisory {
    fn from(resolution: &Resolution) -> Self {
        Self {
            mode: resolution.mode,
            vertical_speed_fpm: resolution.vertical_speed.map(ms_to_fpm),
            ground_speed_kn: resolution
                .ground_speed
                .map(|s| ms_to_knots(s.ground_speed())),
            track_deg: resolution.track.as_ref().map(track_deg),
            optimal: resolution.optimal.as_ref().map(|s| OptimalAdvisory {
                track_deg: track_deg(s),
                ground_speed_kn: ms_to_knots(s.ground_speed()),
            }),
        }
    }
}

/// One ownship/traffic pair, projected into the traffic-centred frame.
#[derive(Debug, Clone)]
pub struct Cdr {
    resolver: Resolver,
    frame: LocalFrame,
    ownship: AircraftState,
    traffic: AircraftState,
    s: Vector3,
    vo: Vector3,
    vi: Vector3,
    /// Great-circle distance from ownship to traffic (nm).
    pub distance_nm: f64,
    /// Initial true course from ownship to traffic (deg).
    pub course_deg: f64,
}

impl Cdr {
    pub fn new(
        separation: &SeparationConfig,
        ownship: AircraftState,
        traffic: AircraftState,
    ) -> Result<Self, CdrError> {
        let volume = ProtectedVolume::new(
            nm_to_m(separation.horizontal_nm),
            ft_to_m(separation.vertical_ft),
            separation.lookahead_s,
        )?;
        let detector = Detector::with_filter(volume, separation.filter_s)?;

        let (lat_o, lon_o) = (ownship.lat_deg.to_radians(), ownship.lon_deg.to_radians());
        let (lat_i, lon_i) = (traffic.lat_deg.to_radians(), traffic.lon_deg.to_radians());

        let frame = LocalFrame::new(lat_i, lon_i)?;
        let [sx, sy] = frame.to_xy(lat_o, lon_o)?;
        let s = [sx, sy, ft_to_m(ownship.alt_ft - traffic.alt_ft)];

        let distance_nm = gc_dist(lat_o, lon_o, lat_i, lon_i).to_degrees() * 60.0;
        let course_deg = normalize_deg(true_course(lat_o, lon_o, lat_i, lon_i).to_degrees());

        debug!("relative position {s:?} m, distance {distance_nm:.3} nm");

        Ok(Self {
            resolver: Resolver::with_detector(detector),
            frame,
            ownship,
            traffic,
            s,
            vo: ownship.velocity_ms(),
            vi: traffic.velocity_ms(),
            distance_nm,
            course_deg,
        })
    }

    pub fn from_config(config: &EncounterConfig) -> Result<Self, CdrError> {
        Self::new(
            &config.separation,
            AircraftState::from(&config.ownship),
            AircraftState::from(&config.traffic),
        )
    }

    /// Ownship position relative to traffic (m).
    pub fn relative_position(&self) -> Vector3 {
        self.s
    }

    /// Ownship velocity relative to traffic (m/s).
    pub fn relative_velocity(&self) -> Vector3 {
        sub(&self.vo, &self.vi)
    }

    pub fn ownship(&self) -> &AircraftState {
        &self.ownship
    }

    pub fn traffic(&self) -> &AircraftState {
        &self.traffic
    }

    pub fn detector(&self) -> &Detector {
        self.resolver.detector()
    }

    pub fn detect(&self) -> Detection {
        self.detector().detect(&self.s, &self.relative_velocity())
    }

    pub fn is_violating(&self) -> bool {
        self.detector().is_violating(&self.s)
    }

    /// Full resolution in engine units (m, s).
    pub fn resolution(&self) -> Resolution {
        self.resolver.resolve(&self.s, &self.vo, &self.vi)
    }

    /// Resolution converted to knots, degrees, and ft/min.
    pub fn resolve(&self) -> Advisory {
        Advisory::from(&self.resolution())
    }

    /// Where both aircraft are when separation is lost and regained, following current velocities.
    pub fn conflict_locations(
        &self,
        detection: &Detection,
    ) -> Result<Option<ConflictLocations>, CdrError> {
        let Some(timing) = detection.timing.filter(|_| detection.conflict) else {
            return Ok(None);
        };

        let ownship_origin = [self.s[0], self.s[1], 0.0];
        let at = |origin: &Vector3, velocity: &Vector3, alt_ft: f64, t: f64| {
            let [x, y, z] = add(origin, &scale(velocity, t));
            self.frame.to_geo(x, y).map(|(lat, lon)| GeoPoint {
                lat_deg: lat.to_degrees(),
                lon_deg: lon.to_degrees(),
                alt_ft: alt_ft + m_to_ft(z),
            })
        };

        Ok(Some(ConflictLocations {
            ownship_entry: at(&ownship_origin, &self.vo, self.ownship.alt_ft, timing.t_in)?,
            ownship_exit: at(&ownship_origin, &self.vo, self.ownship.alt_ft, timing.t_out)?,
            traffic_entry: at(&[0.0; 3], &self.vi, self.traffic.alt_ft, timing.t_in)?,
            traffic_exit: at(&[0.0; 3], &self.vi, self.traffic.alt_ft, timing.t_out)?,
        }))
    }
}

/// Everything computed for one configured encounter.
#[derive(Debug, Clone, Serialize)]
pub struct EncounterOutcome {
    pub name: String,
    pub distance_nm: f64,
    pub course_deg: f64,
    pub detection: Detection,
    pub advisory: Advisory,
    pub locations: Option<ConflictLocations>,
}

impl EncounterOutcome {
    /// Flatten into the CSV summary row.
    pub fn summary_record(&self) -> summary::Record<'_> {
        let timing = self.detection.timing.filter(|_| self.detection.conflict);
        summary::Record {
            encounter: &self.name,
            distance_nm: self.distance_nm,
            course_deg: self.course_deg,
            conflict: self.detection.conflict,
            violation: self.detection.violation,
            time2los_s: timing.map(|t| t.time2los),
            duration_s: timing.map(|t| t.duration),
            mode: match self.advisory.mode {
                ResolutionMode::Skipped => "skipped",
                ResolutionMode::Coordinated => "coordinated",
                ResolutionMode::Recovery => "recovery",
            },
            vs_only_fpm: self.advisory.vertical_speed_fpm,
            gs_only_kn: self.advisory.ground_speed_kn,
            trk_only_deg: self.advisory.track_deg,
            opt_trk_deg: self.advisory.optimal.map(|o| o.track_deg),
            opt_gs_kn: self.advisory.optimal.map(|o| o.ground_speed_kn),
        }
    }
}

/// Detect, resolve, and locate a configured encounter.
pub fn run_encounter(config: &EncounterConfig) -> Result<EncounterOutcome, CdrError> {
    let cdr = Cdr::from_config(config)?;
    let resolution = cdr.resolution();
    let locations = cdr.conflict_locations(&resolution.detection)?;
    if resolution.detection.conflict && !resolution.has_candidate() {
        warn!("encounter '{}': conflict predicted but no maneuver resolves it", config.name);
    }
    Ok(EncounterOutcome {
        name: config.name.clone(),
        distance_nm: cdr.distance_nm,
        course_deg: cdr.course_deg,
        detection: resolution.detection,
        advisory: Advisory::from(&resolution),
        locations,
    })
}
