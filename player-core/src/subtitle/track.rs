//! Subtitle tracks and track selection

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::cue::Cue;

/// Selection sentinel meaning "no subtitles"
pub const OFF: &str = "off";

/// Load lifecycle of a single track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// A subtitle track for one language
#[derive(Debug, Clone)]
pub struct Track {
    language: String,
    source: Option<String>,
    cues: Vec<Cue>,
    load_state: LoadState,
}

impl Track {
    /// Create a track that has not been fetched yet.
    ///
    /// A track without a source is the "disabled" track: it is `Loaded`
    /// straight away and never has cues.
    pub fn new(language: impl Into<String>, source: Option<String>) -> Self {
        let load_state = if source.is_some() {
            LoadState::Unloaded
        } else {
            LoadState::Loaded
        };
        Self {
            language: language.into(),
            source,
            cues: Vec::new(),
            load_state,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub(crate) fn into_loading(mut self) -> Self {
        if self.source.is_some() {
            self.load_state = LoadState::Loading;
        }
        self
    }

    pub(crate) fn into_loaded(mut self, cues: Vec<Cue>) -> Self {
        self.cues = cues;
        self.load_state = LoadState::Loaded;
        self
    }

    pub(crate) fn into_failed(mut self) -> Self {
        self.cues = Vec::new();
        self.load_state = LoadState::Failed;
        self
    }

    /// Find the cue showing at `time`.
    ///
    /// Cues may overlap and need not be sorted, so this is a full scan;
    /// the first match in parse order wins.
    pub fn cue_at(&self, time: f64) -> Option<&Cue> {
        self.cues.iter().find(|cue| cue.contains(time))
    }

    /// Summary used by the subtitle menu
    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            language: self.language.clone(),
            load_state: self.load_state,
            cue_count: self.cues.len(),
        }
    }
}

/// Menu entry for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub language: String,
    pub load_state: LoadState,
    pub cue_count: usize,
}

/// Which subtitle track the viewer asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TrackSelection {
    #[default]
    Off,
    Language(String),
}

impl TrackSelection {
    /// Language code, or `None` when subtitles are off
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Off => None,
            Self::Language(code) => Some(code),
        }
    }

    pub fn as_str(&self) -> &str {
        self.language().unwrap_or(OFF)
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl From<&str> for TrackSelection {
    fn from(code: &str) -> Self {
        if code.is_empty() || code == OFF {
            Self::Off
        } else {
            Self::Language(code.to_string())
        }
    }
}

impl From<Option<String>> for TrackSelection {
    fn from(code: Option<String>) -> Self {
        code.as_deref().map(Self::from).unwrap_or_default()
    }
}

impl fmt::Display for TrackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TrackSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TrackSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from(code.as_str()))
    }
}
