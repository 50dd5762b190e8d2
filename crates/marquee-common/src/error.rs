//! Common error types used throughout marquee.
//!
//! Catalog access never surfaces these to page rendering; they exist so the
//! data-access layer can say *why* it produced no data before logging it.

/// Common error type for marquee.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record does not exist upstream.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The upstream catalog could not be reached or answered with a failure status.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The upstream body was not the JSON shape we expected.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Upstream error.
    pub fn upstream<S: Into<String>>(msg: S) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
