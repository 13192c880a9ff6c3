use thiserror::Error;

/// Main error type for the headless player
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Player error: {0}")]
    Player(#[from] player_core::PlayerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Failed to encode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
