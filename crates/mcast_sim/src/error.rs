//! Error types for experiment operations.

use thiserror::Error;

/// Errors that can occur while setting up or running an experiment.
#[derive(Debug, Error)]
pub enum Error {
    /// The experiment configuration cannot be run.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reachability was requested over an empty subscriber set.
    #[error("reachability needs at least one subscriber")]
    EmptySubscribers,

    /// Topology error.
    #[error(transparent)]
    Topology(#[from] mcast_topology::Error),

    /// Failure model error.
    #[error(transparent)]
    Failure(#[from] mcast_failure::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML config error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// CSV export error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for experiment operations.
pub type Result<T> = std::result::Result<T, Error>;
