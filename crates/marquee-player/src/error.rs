//! Error types for the playback engine.

use std::path::PathBuf;

/// Errors raised by the playback engine and its helpers.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// A player configuration value is out of range.
    #[error("Invalid player config: {0}")]
    InvalidConfig(String),

    /// A quality level index that the current manifest does not offer.
    #[error("Invalid quality level {index} (available: {available})")]
    InvalidLevel { index: usize, available: usize },

    /// Quality switching requested while playing through native HLS.
    #[error("Quality selection is not supported by native playback")]
    QualityUnsupported,

    /// An operation needed an episode but the playlist is empty.
    #[error("No active episode")]
    NoActiveEpisode,

    /// The player was torn down and cannot attach again.
    #[error("Player has been torn down")]
    Destroyed,

    /// Neither the adaptive-stream client nor native HLS is available.
    #[error("HLS playback is not supported on this platform")]
    UnsupportedPlayback,

    /// A manifest could not be parsed.
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// The progress file could not be written.
    #[error("Failed to write progress file {path}: {source}")]
    ProgressWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PlayerError {
    /// Create a new InvalidConfig error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new Manifest error.
    pub fn manifest<S: Into<String>>(msg: S) -> Self {
        Self::Manifest(msg.into())
    }
}

/// Result type alias using the player error type.
pub type Result<T> = std::result::Result<T, PlayerError>;
