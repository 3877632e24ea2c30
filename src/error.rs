//! Error types for trailmark

use std::path::PathBuf;
use thiserror::Error;

/// Which form input a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::Elevation => "elevation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NonFinite { field: Field },

    #[error("{field} must be positive")]
    NotPositive { field: Field },
}

impl ValidationError {
    pub const fn field(&self) -> Field {
        match self {
            Self::NonFinite { field } | Self::NotPositive { field } => *field,
        }
    }

    /// Text shown to the user when a submit is rejected.
    pub const fn user_message(&self) -> &'static str {
        "Inputs have to be positive numbers!"
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Location unavailable: {reason}")]
    LocationUnavailable { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Stored workouts could not be parsed: {0}")]
    PersistenceParse(#[source] serde_json::Error),

    #[error("Failed to write key {key:?}: {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("Storage file {path} is unreadable: {reason}")]
    StorageFile { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
