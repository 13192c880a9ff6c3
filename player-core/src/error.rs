use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the player engine
///
/// None of these escape the engine's user-facing operations: load failures
/// become `Failed` tracks, rejected play requests are reconciled, and
/// fullscreen failures are logged. They surface only at the host seams.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// The HTTP request for a subtitle source failed before a response arrived
    #[error("Failed to fetch subtitle source {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// The subtitle source answered with a non-success status
    #[error("Subtitle source {location} answered with HTTP {status}")]
    HttpStatus { location: String, status: u16 },

    /// A local subtitle file could not be read
    #[error("Failed to read subtitle file {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source location uses a scheme we cannot load from
    #[error("Invalid subtitle source: {0}")]
    InvalidSource(String),

    /// The host media element refused to start playback
    #[error("Play request rejected: {0}")]
    PlayRejected(String),

    /// The host refused to enter or leave fullscreen
    #[error("Fullscreen request failed: {0}")]
    Fullscreen(String),

    /// Player configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlayerError>;
