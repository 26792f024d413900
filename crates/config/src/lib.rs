//! Configuration models and loaders for KB3D encounters.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Separation standard and lookahead, in aviation units.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SeparationConfig {
    /// Horizontal separation D (nautical miles).
    #[serde(default = "default_horizontal_nm")]
    pub horizontal_nm: f64,
    /// Vertical separation H (feet).
    #[serde(default = "default_vertical_ft")]
    pub vertical_ft: f64,
    /// Lookahead time T (seconds).
    #[serde(default = "default_lookahead_s")]
    pub lookahead_s: f64,
    /// Conflicts lasting no longer than this are not reported (seconds).
    #[serde(default)]
    pub filter_s: f64,
}

fn default_horizontal_nm() -> f64 {
    5.0
}

fn default_vertical_ft() -> f64 {
    1_000.0
}

fn default_lookahead_s() -> f64 {
    300.0
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            horizontal_nm: default_horizontal_nm(),
            vertical_ft: default_vertical_ft(),
            lookahead_s: default_lookahead_s(),
            filter_s: 0.0,
        }
    }
}

/// Aircraft state as reported by surveillance.
///
/// Track is true north clockwise; East longitudes are positive.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AircraftConfig {
    #[serde(default)]
    pub callsign: Option<String>,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_ft: f64,
    pub trk_deg: f64,
    pub gs_kn: f64,
    #[serde(default)]
    pub vs_fpm: f64,
}

/// A single ownship/traffic pair to evaluate.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EncounterConfig {
    pub name: String,
    #[serde(default)]
    pub separation: SeparationConfig,
    pub ownship: AircraftConfig,
    pub traffic: AircraftConfig,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("encounter '{name}': {reason}")]
    Invalid { name: String, reason: String },
    #[error("no encounters found in {0}")]
    Empty(PathBuf),
}

impl EncounterConfig {
    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            name: self.name.clone(),
            reason,
        };

        let sep = &self.separation;
        if !(sep.horizontal_nm > 0.0) {
            return Err(invalid(format!(
                "horizontal separation must be positive, got {} nm",
                sep.horizontal_nm
            )));
        }
        if !(sep.vertical_ft > 0.0) {
            return Err(invalid(format!(
                "vertical separation must be positive, got {} ft",
                sep.vertical_ft
            )));
        }
        if !(sep.lookahead_s > 0.0) {
            return Err(invalid(format!(
                "lookahead must be positive, got {} s",
                sep.lookahead_s
            )));
        }
        if !(sep.filter_s >= 0.0) {
            return Err(invalid(format!(
                "filter must be non-negative, got {} s",
                sep.filter_s
            )));
        }

        for (role, aircraft) in [("ownship", &self.ownship), ("traffic", &self.traffic)] {
            if !(-90.0..=90.0).contains(&aircraft.lat_deg) {
                return Err(invalid(format!(
                    "{role} latitude {} out of range",
                    aircraft.lat_deg
                )));
            }
            let values = [
                aircraft.lon_deg,
                aircraft.alt_ft,
                aircraft.trk_deg,
                aircraft.gs_kn,
                aircraft.vs_fpm,
            ];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(invalid(format!("{role} state contains non-finite values")));
            }
            if aircraft.gs_kn < 0.0 {
                return Err(invalid(format!(
                    "{role} ground speed must be non-negative, got {} kn",
                    aircraft.gs_kn
                )));
            }
        }
        Ok(())
    }
}

/// Load encounters from a TOML file, a directory of TOML files, or a YAML list.
pub fn load_encounters<P: AsRef<Path>>(path: P) -> Result<Vec<EncounterConfig>, ConfigError> {
    let path = path.as_ref();
    let encounters: Vec<EncounterConfig> = load_records(path)?;
    if encounters.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    for encounter in &encounters {
        encounter.validate()?;
    }
    Ok(encounters)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
