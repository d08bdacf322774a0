//! Error kinds surfaced to the simulator: artifact load failures and per-request scoring failures.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Loading the pipeline artifact failed. Terminal for the process: the scoring
/// path stays disabled until a restart with a valid artifact.
///
/// `Clone` so a cached failure can be handed to every later caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("model artifact not found at {path}: {reason}")]
    NotFound { path: PathBuf, reason: String },

    #[error("model artifact at {path} could not be read: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("model artifact at {path} is incompatible: {reason}")]
    Incompatible { path: PathBuf, reason: String },

    #[error("unsupported model artifact format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl LoadError {
    pub(crate) fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        let reason = err.to_string();
        match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound { path, reason },
            _ => LoadError::Unreadable { path, reason },
        }
    }

    pub(crate) fn incompatible(path: &Path, reason: impl ToString) -> Self {
        LoadError::Incompatible {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path, .. }
            | LoadError::Unreadable { path, .. }
            | LoadError::Incompatible { path, .. }
            | LoadError::UnsupportedFormat { path } => path,
        }
    }
}

/// The configuration file exists but is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config file {path} could not be read: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("config file {path} is malformed: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// A simulator session ended early.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("session i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single scoring request failed. Does not affect later requests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("prediction failed: {0}")]
    Inference(String),

    #[error("pipeline returned an invalid probability distribution: {0}")]
    InvalidOutput(String),
}

impl ScoringError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Raised by a classifier backend when it rejects or fails on its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PipelineError {
    pub message: String,
}

impl PipelineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ScoringError {
    fn from(e: PipelineError) -> Self {
        ScoringError::Inference(e.message)
    }
}
