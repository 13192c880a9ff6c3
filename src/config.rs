//! Headless player configuration

use player_core::{PlayerConfig, TrackSources};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Simulated media element configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Length of the simulated media in seconds
    pub duration_secs: f64,

    /// Interval between time updates in milliseconds
    pub tick_ms: u64,

    /// Start playback right after mount
    pub autoplay: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60.0,
            tick_ms: 250, // browsers fire timeupdate every 15-250ms
            autoplay: true,
        }
    }
}

impl MediaConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Subtitle source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Directory relative subtitle paths are resolved against
    pub base_dir: Option<PathBuf>,

    /// Language code -> source location. An empty location is a disabled
    /// track.
    pub tracks: BTreeMap<String, String>,
}

impl SubtitleConfig {
    /// Source map in the shape the engine expects
    pub fn track_sources(&self) -> TrackSources {
        self.tracks
            .iter()
            .map(|(lang, location)| {
                let location = location.trim();
                let source = (!location.is_empty()).then(|| location.to_string());
                (lang.clone(), source)
            })
            .collect()
    }
}

/// Headless player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessConfig {
    /// Engine tunables
    pub player: PlayerConfig,

    /// Simulated media
    pub media: MediaConfig,

    /// Subtitle tracks to load on start
    pub subtitles: SubtitleConfig,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            media: MediaConfig::default(),
            subtitles: SubtitleConfig::default(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl HeadlessConfig {
    /// Filter directive used when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!(
            "player_headless={level},player_core={level}",
            level = self.log_level
        )
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
