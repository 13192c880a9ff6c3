//! Configuration file support
//!
//! Loads headless player configuration from TOML files.

use player_core::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{HeadlessConfig, MediaConfig, SubtitleConfig};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Engine settings; omitted keys keep their defaults
    #[serde(default)]
    pub player: PlayerConfig,
    /// Simulated media settings
    pub media: MediaSettings,
    /// Subtitle settings
    pub subtitles: Option<SubtitleSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSettings {
    /// Media length in seconds
    pub duration_secs: f64,
    /// Time update interval in milliseconds
    pub tick_ms: Option<u64>,
    /// Start playing after mount
    pub autoplay: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleSettings {
    /// Base directory for relative subtitle paths
    pub base_dir: Option<PathBuf>,
    /// Language code -> location ("" for a disabled track)
    #[serde(default)]
    pub tracks: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            player: PlayerConfig::default(),
            media: MediaSettings {
                duration_secs: 60.0,
                tick_ms: Some(250),
                autoplay: Some(true),
            },
            subtitles: Some(SubtitleSettings {
                base_dir: Some(PathBuf::from("subtitles")),
                tracks: BTreeMap::from([
                    ("eng".to_string(), "eng.vtt".to_string()),
                    ("off".to_string(), String::new()),
                ]),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to HeadlessConfig
    pub fn into_headless_config(self) -> HeadlessConfig {
        let defaults = MediaConfig::default();
        let (log_level, log_format) = match self.logging {
            Some(logging) => (
                logging.level,
                logging.format.unwrap_or_else(|| "pretty".to_string()),
            ),
            None => ("info".to_string(), "pretty".to_string()),
        };

        HeadlessConfig {
            player: self.player,
            media: MediaConfig {
                duration_secs: self.media.duration_secs,
                tick_ms: self.media.tick_ms.unwrap_or(defaults.tick_ms),
                autoplay: self.media.autoplay.unwrap_or(defaults.autoplay),
            },
            subtitles: self
                .subtitles
                .map(|s| SubtitleConfig {
                    base_dir: s.base_dir,
                    tracks: s.tracks,
                })
                .unwrap_or_default(),
            log_level,
            log_format,
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        assert_eq!(config.media.duration_secs, 60.0);
        assert_eq!(config.player.seek_step_secs, 5.0);
        assert_eq!(config.subtitles.unwrap().tracks.len(), 2);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.media.duration_secs, config.media.duration_secs);
        assert_eq!(loaded.player, config.player);
    }

    #[test]
    fn test_partial_player_section() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                b"[player]\nseek_step_secs = 10.0\ndefault_track = \"spa\"\n\n\
                  [media]\nduration_secs = 12.5\n\n\
                  [subtitles]\ntracks = { spa = \"spa.vtt\", off = \"\" }\n",
            )
            .unwrap();

        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_headless_config();
        assert_eq!(config.player.seek_step_secs, 10.0);
        assert_eq!(config.player.controls_hide_delay_ms, 2000);
        assert_eq!(config.player.default_track.as_deref(), Some("spa"));
        assert_eq!(config.media.duration_secs, 12.5);
        assert_eq!(config.media.tick_ms, 250);
        assert_eq!(config.subtitles.track_sources()["off"], None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_into_headless_config() {
        let config = ConfigFile::default_config().into_headless_config();
        assert_eq!(config.media.tick_ms, 250);
        assert!(config.media.autoplay);
        assert_eq!(config.subtitles.base_dir, Some(PathBuf::from("subtitles")));
        assert_eq!(config.log_format, "pretty");
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let loaded = ConfigFile::from_file(&path).unwrap();
        assert_eq!(loaded.media.duration_secs, 60.0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[media]\nduration_secs = \"long\"\n").unwrap();
        assert!(ConfigFile::from_file(temp_file.path()).is_err());
    }
}
