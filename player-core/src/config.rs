//! Player configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{PlayerError, Result};

/// Tunables for one player instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Idle time before the control bar hides, in milliseconds
    pub controls_hide_delay_ms: u64,

    /// How long the center play/pause glyph stays up after a toggle
    pub center_icon_flash_ms: u64,

    /// Seconds moved by the arrow-key shortcuts
    pub seek_step_secs: f64,

    /// Play when the player scrolls into view, pause when it leaves
    pub autoplay_on_visible: bool,

    /// Visible fraction of the player that counts as "in view"
    pub visibility_threshold: f64,

    /// Track selected on mount; `None` means subtitles start off
    pub default_track: Option<String>,

    /// HTTP timeout for subtitle fetches in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            controls_hide_delay_ms: 2000,
            center_icon_flash_ms: 800,
            seek_step_secs: 5.0,
            autoplay_on_visible: false,
            visibility_threshold: 0.5,
            default_track: None,
            fetch_timeout_secs: 10,
        }
    }
}

impl PlayerConfig {
    pub fn controls_hide_delay(&self) -> Duration {
        Duration::from_millis(self.controls_hide_delay_ms)
    }

    pub fn center_icon_flash(&self) -> Duration {
        Duration::from_millis(self.center_icon_flash_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Reject values the state machine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0) {
            return Err(PlayerError::Config(format!(
                "seek_step_secs must be positive, got {}",
                self.seek_step_secs
            )));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(PlayerError::Config(format!(
                "visibility_threshold must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(PlayerError::Config(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
