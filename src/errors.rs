use crate::catalog::FragmentId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the Kepler equation solver for a single body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeplerError {
    #[error("Kepler iteration did not converge after {iterations} iterations (residual {residual:e} rad)")]
    NotConverged { iterations: usize, residual: f64 },
    #[error("eccentricity {0} is outside the elliptical range [0, 1)")]
    UnsupportedEccentricity(f64),
    #[error("invalid orbital input (a = {a}, t = {t}, M0 = {m0})")]
    InvalidInput { a: f64, t: f64, m0: f64 },
}

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot open dataset {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("only {available} '{family}' records above the collision altitude, {requested} requested")]
    InsufficientRecords {
        family: String,
        requested: usize,
        available: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
    #[error("target fraction {0} is unreachable, it must lie in (0, 1]")]
    UnreachableTarget(f64),
    #[error("catalog holds {actual} fragments but the scenario expects {expected}")]
    CatalogSizeMismatch { expected: usize, actual: usize },
    #[error("cannot read configuration file {path:?}: {reason}")]
    File { path: PathBuf, reason: String },
}

/// The body whose propagation failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Spacecraft,
    Fragment { id: FragmentId, name: String },
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Spacecraft => write!(f, "spacecraft"),
            Body::Fragment { id, name } => write!(f, "fragment {} ({})", id, name),
        }
    }
}

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("data load error: {0}")]
    DataLoad(#[from] DataLoadError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("propagation of {body} failed at t = {time_s} s: {source}")]
    Convergence {
        time_s: f64,
        body: Body,
        #[source]
        source: KeplerError,
    },
    #[error("sweep is no longer running (state: {0})")]
    NotRunning(crate::fsm::SweepState),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;
