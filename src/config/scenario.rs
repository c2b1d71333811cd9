//! Scenario parameters, loadable from TOML.
//!
//! Every field but `target_fraction` defaults to the Kosmos 2251 reference scenario:
//!
//! ```toml
//! target_fraction = 0.8
//! family = "Kosmos 2251-Collision-Fragment"
//! catalog_size = 10
//! step_s = 50.0
//!
//! [solver]
//! tolerance = 1e-10
//! max_iterations = 50
//! ```

use crate::catalog::CatalogFilter;
use crate::constants::{H_COLLISION, KOSMOS_FAMILY, R_EARTH};
use crate::errors::ConfigurationError;
use crate::physics::orbital::KeplerSolver;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Fragment family, matched exactly against the dataset's `Name` column.
    #[serde(default = "default_family")]
    pub family: String,
    /// Number of fragments (N) taken from the filtered dataset.
    #[serde(default = "default_catalog_size")]
    pub catalog_size: usize,
    /// Altitude of the historical collision [m]; fragments must orbit above it.
    #[serde(default = "default_collision_altitude")]
    pub collision_altitude_m: f64,
    /// Simulation start, seconds after the element epoch (t0).
    #[serde(default = "default_epoch_offset")]
    pub epoch_offset_s: f64,
    /// Fixed time step (dt) [s].
    #[serde(default = "default_step")]
    pub step_s: f64,
    /// Spacecraft altitude above the collision altitude [m].
    #[serde(default = "default_altitude_offset")]
    pub altitude_offset_m: f64,
    /// Capture distance [m].
    #[serde(default = "default_capture_threshold")]
    pub capture_threshold_m: f64,
    /// Removed fraction at which the sweep stops. Required.
    pub target_fraction: f64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    #[serde(default)]
    pub wall_clock_limit_s: Option<f64>,
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_family() -> String {
    KOSMOS_FAMILY.to_string()
}
fn default_catalog_size() -> usize {
    10
}
fn default_collision_altitude() -> f64 {
    H_COLLISION
}
fn default_epoch_offset() -> f64 {
    30.0 * 100.0 * 60.0
}
fn default_step() -> f64 {
    50.0
}
fn default_altitude_offset() -> f64 {
    40_000.0
}
fn default_capture_threshold() -> f64 {
    100_000.0
}
fn default_max_ticks() -> u64 {
    1_000_000
}
fn default_tolerance() -> f64 {
    1e-10
}
fn default_max_iterations() -> usize {
    50
}

impl ScenarioConfig {
    /// Reference scenario with the given stopping fraction.
    pub fn new(target_fraction: f64) -> Self {
        Self {
            family: default_family(),
            catalog_size: default_catalog_size(),
            collision_altitude_m: default_collision_altitude(),
            epoch_offset_s: default_epoch_offset(),
            step_s: default_step(),
            altitude_offset_m: default_altitude_offset(),
            capture_threshold_m: default_capture_threshold(),
            target_fraction,
            max_ticks: default_max_ticks(),
            wall_clock_limit_s: None,
            solver: SolverConfig::default(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|e| ConfigurationError::File {
            path: Default::default(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let file_error = |reason: String| ConfigurationError::File {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        toml::from_str(&text).map_err(|e| file_error(e.to_string()))
    }

    /// Rejects parameter combinations the sweep cannot run with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigurationError {
            ConfigurationError::InvalidParameter {
                field,
                reason: reason.into(),
            }
        }

        if !(self.target_fraction > 0.0 && self.target_fraction <= 1.0) {
            return Err(ConfigurationError::UnreachableTarget(self.target_fraction));
        }
        if self.family.trim().is_empty() {
            return Err(invalid("family", "must not be empty"));
        }
        if self.catalog_size == 0 {
            return Err(invalid("catalog_size", "at least one fragment is required"));
        }
        if !(self.capture_threshold_m.is_finite() && self.capture_threshold_m > 0.0) {
            return Err(invalid(
                "capture_threshold_m",
                format!("{} is not a positive distance", self.capture_threshold_m),
            ));
        }
        if !(self.step_s.is_finite() && self.step_s > 0.0) {
            return Err(invalid(
                "step_s",
                format!("{} is not a positive duration", self.step_s),
            ));
        }
        if hifitime::Duration::from_seconds(self.step_s) <= hifitime::Duration::ZERO {
            return Err(invalid(
                "step_s",
                format!("{} s is below the clock resolution of 1 ns", self.step_s),
            ));
        }
        for (field, value) in [
            ("epoch_offset_s", self.epoch_offset_s),
            ("collision_altitude_m", self.collision_altitude_m),
            ("altitude_offset_m", self.altitude_offset_m),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, format!("{} is not finite", value)));
            }
        }
        if self.spacecraft_semi_major_axis() <= 0.0 {
            return Err(invalid(
                "altitude_offset_m",
                "spacecraft orbit would lie inside the Earth's centre",
            ));
        }
        if self.max_ticks == 0 {
            return Err(invalid("max_ticks", "must allow at least one tick"));
        }
        if let Some(limit) = self.wall_clock_limit_s {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(invalid(
                    "wall_clock_limit_s",
                    format!("{} is not a positive duration", limit),
                ));
            }
        }
        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            return Err(invalid("solver.tolerance", "must be positive"));
        }
        if self.solver.max_iterations == 0 {
            return Err(invalid("solver.max_iterations", "must be at least 1"));
        }
        Ok(())
    }

    /// Fragments must orbit above this semi-major axis [m].
    pub fn collision_semi_major_axis(&self) -> f64 {
        R_EARTH + self.collision_altitude_m
    }

    pub fn spacecraft_semi_major_axis(&self) -> f64 {
        self.collision_semi_major_axis() + self.altitude_offset_m
    }

    pub fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter {
            family: self.family.clone(),
            min_semi_major_axis: self.collision_semi_major_axis(),
            count: self.catalog_size,
        }
    }

    pub fn solver(&self) -> KeplerSolver {
        KeplerSolver::new(self.solver.tolerance, self.solver.max_iterations)
    }

    pub fn wall_clock_limit(&self) -> Option<Duration> {
        self.wall_clock_limit_s.map(Duration::from_secs_f64)
    }
}
