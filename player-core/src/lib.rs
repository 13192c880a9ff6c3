pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod interaction;
pub(crate) mod media;
pub(crate) mod revision;
pub(crate) mod subtitle;

#[cfg(test)]
pub(crate) mod tests;

pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use interaction::autoplay::{VisibilityAction, VisibilityGate};
pub use interaction::fullscreen::{FullscreenTarget, NoFullscreen};
pub use interaction::input::{
    ClickTarget, ControlButton, Focus, Key, KeyHandling, KeyPress, ProgressTrack, Shortcut,
};
pub use interaction::player::{Player, PlayerSnapshot};
pub use interaction::shortcuts::{KeyHandler, PlayerId, ShortcutHub, ShortcutRegistration};
pub use interaction::timer::{TimerEpoch, TimerSlot};
pub use interaction::ui_state::UiState;
pub use media::controller::{format_clock, PlaybackController, PlaybackState};
pub use media::element::{MediaElement, MediaEvent, MediaListener, Subscription};
pub use subtitle::cue::{format_timestamp, parse_timestamp, Cue};
pub use subtitle::fetch::{SourceFetcher, SubtitleFetcher};
pub use subtitle::parser::parse as parse_cues;
pub use subtitle::registry::{LoadOutcome, SubtitleTracks, TrackRegistry, TrackSources};
pub use subtitle::track::{LoadState, Track, TrackSelection, TrackSummary, OFF};
