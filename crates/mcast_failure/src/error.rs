//! Error types for failure models.

use thiserror::Error;

/// Errors that can occur when configuring a failure model.
#[derive(Debug, Error)]
pub enum Error {
    /// A failure probability outside `[0, 1]`.
    #[error("failure probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    /// The failure model name is not known.
    #[error("unknown failure model: {0}")]
    UnknownModel(String),

    /// More failures requested than the topology has elements.
    #[error("cannot fail {requested} {what}: topology only has {available}")]
    TooManyFailures {
        /// What was requested to fail ("switches" or "links").
        what: &'static str,
        /// Number requested.
        requested: usize,
        /// Number available.
        available: usize,
    },
}

/// Result type alias for failure model operations.
pub type Result<T> = std::result::Result<T, Error>;
