//! Error types for topology operations.

use thiserror::Error;

/// Errors that can occur while building or querying a topology.
#[derive(Debug, Error)]
pub enum Error {
    /// The topology type named in a spec is not known.
    #[error("unrecognized or unimplemented topology type: {0}")]
    UnknownTopology(String),

    /// The topology spec or file is malformed.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A node id does not exist in the topology.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// No tree builder is registered under this name.
    #[error("unknown multicast heuristic: {0}")]
    UnknownHeuristic(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;
