use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("elevation lookup failed for chunk {chunk}: {source}")]
    Upstream {
        /// Index of the failing chunk.
        chunk: usize,
        source: LookupError,
    },

    #[error("cancelled")]
    Cancelled,
}

/// Failure of a single elevation lookup request.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("upstream reported {0}")]
    Service(String),

    #[error("malformed response, {0}")]
    Malformed(String),

    #[error("expected {expected} elevations, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("no response within {0:?}")]
    Timeout(Duration),
}
