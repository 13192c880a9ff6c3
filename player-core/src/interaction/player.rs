//! Interaction state machine
//!
//! Combines the playback controller, the subtitle tracks and the UI-only
//! state, and turns user intents (pointer, clicks, keys, visibility) into
//! transitions. The render layer reads [`PlayerSnapshot`]s and watches
//! [`Player::changes`] to know when to read again.
//!
//! Lock discipline: the UI lock is never held while calling into the media
//! element or the fullscreen host, since either may report back
//! synchronously.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use super::autoplay::{VisibilityAction, VisibilityGate};
use super::fullscreen::FullscreenTarget;
use super::input::{
    ClickTarget, ControlButton, Focus, KeyHandling, KeyPress, ProgressTrack, Shortcut,
};
use super::shortcuts::{KeyHandler, PlayerId, ShortcutHub, ShortcutRegistration};
use super::timer::{TimerEpoch, TimerSlot};
use super::ui_state::UiState;
use crate::config::PlayerConfig;
use crate::media::controller::{PlaybackController, PlaybackState};
use crate::media::element::MediaElement;
use crate::revision::Revision;
use crate::subtitle::fetch::SubtitleFetcher;
use crate::subtitle::registry::{LoadOutcome, SubtitleTracks, TrackRegistry, TrackSources};
use crate::subtitle::track::{TrackSelection, TrackSummary};

/// Everything the render layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub revision: u64,
    pub is_playing: bool,
    pub duration: Option<f64>,
    pub current_time: f64,
    pub progress_percentage: f64,
    pub time_label: Option<String>,
    pub active_cue_text: Option<String>,
    #[serde(flatten)]
    pub ui: UiState,
    pub tracks: Vec<TrackSummary>,
}

struct UiCell {
    state: UiState,
    hide_timer: TimerSlot,
    flash_timer: TimerSlot,
    visibility: VisibilityGate,
}

struct Inner<E: MediaElement, H> {
    id: PlayerId,
    config: PlayerConfig,
    host: H,
    controller: PlaybackController<E>,
    ui: Mutex<UiCell>,
    revision: Revision,
}

/// One mounted player instance.
///
/// Dropping it is the unmount: pending timers are aborted, the media
/// listener is detached and keyboard shortcuts are deregistered.
pub struct Player<E: MediaElement, H: FullscreenTarget, F: SubtitleFetcher> {
    inner: Arc<Inner<E, H>>,
    tracks: SubtitleTracks<F>,
    shortcuts: Option<ShortcutRegistration>,
}

impl<E, H, F> Player<E, H, F>
where
    E: MediaElement,
    H: FullscreenTarget,
    F: SubtitleFetcher,
{
    /// Mount a player on `element` inside the `host` container.
    ///
    /// Starts the controls auto-hide countdown, so this must run inside a
    /// tokio runtime.
    pub fn mount(element: Arc<E>, host: H, fetcher: F, config: PlayerConfig) -> Self {
        let revision = Revision::new();
        let selection = TrackSelection::from(config.default_track.clone());
        let visibility = VisibilityGate::new(config.visibility_threshold);

        let inner = Arc::new(Inner {
            id: PlayerId::new(),
            controller: PlaybackController::with_revision(revision.clone()),
            ui: Mutex::new(UiCell {
                state: UiState::new(selection),
                hide_timer: TimerSlot::new(),
                flash_timer: TimerSlot::new(),
                visibility,
            }),
            config,
            host,
            revision,
        });

        inner.controller.attach(element);
        inner.controller.set_muted(false);
        inner.reset_hide_timer();
        tracing::info!(player = %inner.id, "Player mounted");

        Self {
            inner,
            tracks: SubtitleTracks::new(fetcher),
            shortcuts: None,
        }
    }

    /// Route window-level key presses from `hub` to this player
    pub fn with_shortcuts(mut self, hub: &ShortcutHub) -> Self {
        let weak = Arc::downgrade(&self.inner);
        let handler: KeyHandler = Arc::new(move |press: &KeyPress| match weak.upgrade() {
            Some(inner) => inner.handle_key(press),
            None => KeyHandling::Ignored,
        });
        self.shortcuts = Some(hub.register(self.inner.id, handler));
        self
    }

    pub fn id(&self) -> PlayerId {
        self.inner.id
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.inner.config
    }

    /// Revision counter bumped on every state change
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn playback(&self) -> PlaybackState {
        self.inner.controller.state()
    }

    pub fn ui(&self) -> UiState {
        self.inner.ui.lock().state.clone()
    }

    pub fn tracks(&self) -> Arc<TrackRegistry> {
        self.tracks.current()
    }

    /// Current render props. The active cue is looked up from scratch on
    /// every call, so backward seeks need no special handling.
    pub fn snapshot(&self) -> PlayerSnapshot {
        let revision = self.inner.revision.current();
        let playback = self.playback();
        let ui = self.ui();
        let registry = self.tracks.current();
        let active_cue_text = registry
            .selected_cue_text(&ui.selected_track, playback.current_time)
            .map(str::to_string);

        PlayerSnapshot {
            revision,
            is_playing: playback.is_playing,
            duration: playback.duration,
            current_time: playback.current_time,
            progress_percentage: playback.progress_percentage(),
            time_label: playback.time_label(),
            active_cue_text,
            ui,
            tracks: registry.summaries(),
        }
    }

    /// Load a new set of subtitle tracks. Loading the set already in use
    /// is a no-op; a load overtaken by a newer one is discarded.
    pub async fn set_subtitle_sources(&self, sources: TrackSources) -> LoadOutcome {
        self.inner.revision.bump();
        let outcome = self.tracks.load(sources).await;
        if matches!(outcome, LoadOutcome::Applied(_)) {
            self.inner.revision.bump();
        }
        outcome
    }

    /// Swap the media element, e.g. when the host re-renders the video tag
    pub fn replace_element(&self, element: Arc<E>) {
        self.inner.controller.attach(element);
        let muted = self.inner.ui.lock().state.muted;
        self.inner.controller.set_muted(muted);
    }

    pub fn pointer_enter(&self) {
        self.inner.reset_hide_timer();
    }

    pub fn pointer_move(&self) {
        self.inner.reset_hide_timer();
    }

    /// Pointer left the player: hide at once, no countdown
    pub fn pointer_leave(&self) {
        self.inner.hide_controls_now();
    }

    pub fn click(&self, target: ClickTarget) {
        self.inner.click(target);
    }

    pub fn toggle_play(&self) {
        self.inner.toggle_play();
    }

    pub fn seek_to_pointer(&self, pointer_x: f64, track: ProgressTrack) {
        self.inner.seek_to_pointer(pointer_x, track);
    }

    pub fn toggle_mute(&self) {
        self.inner.toggle_mute();
    }

    pub fn toggle_fullscreen(&self) {
        self.inner.toggle_fullscreen();
    }

    pub fn exit_fullscreen(&self) {
        self.inner.exit_fullscreen();
    }

    /// Host notification that fullscreen was entered or left, whoever
    /// caused it
    pub fn on_fullscreen_change(&self, active: bool) {
        self.inner.on_fullscreen_change(active);
    }

    pub fn toggle_subtitle_menu(&self) {
        self.inner.update_ui(UiState::toggle_subtitle_menu);
    }

    pub fn close_subtitle_menu(&self) {
        self.inner.update_ui(UiState::close_subtitle_menu);
    }

    pub fn select_track(&self, selection: TrackSelection) {
        tracing::debug!(player = %self.inner.id, track = %selection, "Subtitle track selected");
        self.inner.update_ui(|ui| ui.select_track(selection));
    }

    /// Keyboard input for players not registered with a [`ShortcutHub`]
    pub fn handle_key(&self, press: &KeyPress) -> KeyHandling {
        self.inner.handle_key(press)
    }

    /// Visible fraction of the player changed (intersection observer)
    pub fn visibility_changed(&self, visible_ratio: f64) {
        self.inner.visibility_changed(visible_ratio);
    }

    /// Tear the player down explicitly. Same as dropping it.
    pub fn unmount(self) {
        tracing::info!(player = %self.inner.id, "Player unmounted");
        self.inner.controller.detach();
    }
}

impl<E, H> Inner<E, H>
where
    E: MediaElement,
    H: FullscreenTarget,
{
    fn update_ui(&self, f: impl FnOnce(&mut UiState)) {
        f(&mut self.ui.lock().state);
        self.revision.bump();
    }

    fn reset_hide_timer(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        {
            let mut ui = self.ui.lock();
            ui.state.show_controls();
            ui.hide_timer
                .arm(self.config.controls_hide_delay(), move |epoch| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_hide_timer(epoch);
                    }
                });
        }
        self.revision.bump();
    }

    fn on_hide_timer(&self, epoch: TimerEpoch) {
        let fired = {
            let mut ui = self.ui.lock();
            let fired = ui.hide_timer.complete(epoch);
            if fired {
                ui.state.hide_controls();
            }
            fired
        };
        if fired {
            self.revision.bump();
        }
    }

    fn hide_controls_now(&self) {
        {
            let mut ui = self.ui.lock();
            ui.hide_timer.cancel();
            ui.state.hide_controls();
        }
        self.revision.bump();
    }

    fn flash_center_icon(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        {
            let mut ui = self.ui.lock();
            ui.state.show_center_icon();
            ui.flash_timer
                .arm(self.config.center_icon_flash(), move |epoch| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_flash_timer(epoch);
                    }
                });
        }
        self.revision.bump();
    }

    fn on_flash_timer(&self, epoch: TimerEpoch) {
        let fired = {
            let mut ui = self.ui.lock();
            let fired = ui.flash_timer.complete(epoch);
            if fired {
                ui.state.hide_center_icon();
            }
            fired
        };
        if fired {
            self.revision.bump();
        }
    }

    fn toggle_play(self: &Arc<Self>) {
        self.controller.toggle_play_pause();
        self.flash_center_icon();
        self.reset_hide_timer();
    }

    fn click(self: &Arc<Self>, target: ClickTarget) {
        match target {
            ClickTarget::Surface => self.toggle_play(),
            // Contained: never reaches the surface handler
            ClickTarget::ControlBar => {}
            ClickTarget::Button(ControlButton::PlayPause) => self.toggle_play(),
            ClickTarget::Button(ControlButton::Mute) => self.toggle_mute(),
            ClickTarget::Button(ControlButton::Subtitles) => {
                self.update_ui(UiState::toggle_subtitle_menu)
            }
            ClickTarget::Button(ControlButton::Fullscreen) => self.toggle_fullscreen(),
            ClickTarget::ProgressTrack { pointer_x, track } => {
                self.seek_to_pointer(pointer_x, track)
            }
        }
    }

    fn seek_to_pointer(&self, pointer_x: f64, track: ProgressTrack) {
        if let Some(percentage) = track.percentage_at(pointer_x) {
            self.controller.seek(percentage);
        }
    }

    fn toggle_mute(&self) {
        let muted = self.ui.lock().state.toggle_mute();
        self.controller.set_muted(muted);
        self.revision.bump();
    }

    fn toggle_fullscreen(&self) {
        if self.ui.lock().state.fullscreen {
            self.exit_fullscreen();
        } else if let Err(e) = self.host.request_fullscreen() {
            tracing::warn!(player = %self.id, "Fullscreen request failed: {}", e);
        }
    }

    fn exit_fullscreen(&self) {
        if let Err(e) = self.host.exit_fullscreen() {
            tracing::warn!(player = %self.id, "Exiting fullscreen failed: {}", e);
        }
    }

    fn on_fullscreen_change(&self, active: bool) {
        let changed = self.ui.lock().state.fullscreen_changed(active);
        if changed {
            tracing::debug!(player = %self.id, active, "Fullscreen changed");
            self.revision.bump();
        }
    }

    fn handle_key(self: &Arc<Self>, press: &KeyPress) -> KeyHandling {
        if press.focus != Focus::Document {
            return KeyHandling::Ignored;
        }
        let Some(shortcut) = Shortcut::for_key(&press.key) else {
            return KeyHandling::Ignored;
        };

        match shortcut {
            Shortcut::TogglePlay => self.toggle_play(),
            Shortcut::SeekForward | Shortcut::SeekBackward => {
                if !self.controller.is_attached() {
                    return KeyHandling::Ignored;
                }
                let step = self.config.seek_step_secs;
                let delta = if shortcut == Shortcut::SeekForward {
                    step
                } else {
                    -step
                };
                self.controller.seek_relative(delta);
            }
            Shortcut::ToggleMute => {
                if !self.controller.is_attached() {
                    return KeyHandling::Ignored;
                }
                self.toggle_mute();
            }
            Shortcut::ToggleFullscreen => self.toggle_fullscreen(),
            Shortcut::ExitFullscreen => {
                if !self.ui.lock().state.fullscreen {
                    return KeyHandling::Ignored;
                }
                self.exit_fullscreen();
            }
        }
        KeyHandling::PreventDefault
    }

    fn visibility_changed(&self, visible_ratio: f64) {
        if !self.config.autoplay_on_visible {
            return;
        }
        let action = self.ui.lock().visibility.observe(visible_ratio);
        match action {
            Some(VisibilityAction::Play) => {
                tracing::debug!(player = %self.id, "Player in view, starting playback");
                self.controller.play();
            }
            Some(VisibilityAction::Pause) => {
                tracing::debug!(player = %self.id, "Player out of view, pausing");
                self.controller.pause();
            }
            None => {}
        }
    }
}
