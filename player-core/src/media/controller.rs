//! Playback controller
//!
//! Wraps one host media element and mirrors its state into
//! [`PlaybackState`]. The element is only ever touched through this type.
//!
//! Host events are the source of truth for `is_playing`. A toggle sets it
//! optimistically so the UI reacts at once, and a rejected play request
//! is reconciled against the element's own paused flag.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::element::{MediaElement, MediaEvent, MediaListener, Subscription};
use crate::revision::Revision;

/// Playback state as the render layer sees it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,
    /// `None` until metadata has loaded
    pub duration: Option<f64>,
    /// Always within `[0, duration]`
    pub current_time: f64,
}

impl PlaybackState {
    /// Position as a percentage of the duration, 0 while unknown
    pub fn progress_percentage(&self) -> f64 {
        match self.duration {
            Some(duration) => (self.current_time / duration * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }

    /// `"m:ss / m:ss"` once the duration is known
    pub fn time_label(&self) -> Option<String> {
        self.duration.map(|duration| {
            format!(
                "{} / {}",
                format_clock(self.current_time),
                format_clock(duration)
            )
        })
    }

    fn apply(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded { duration } => {
                self.duration = (duration.is_finite() && duration > 0.0).then_some(duration);
                self.current_time = 0.0;
            }
            MediaEvent::TimeUpdate { current_time } => {
                if current_time.is_finite() {
                    let upper = self.duration.unwrap_or(f64::INFINITY);
                    self.current_time = current_time.clamp(0.0, upper);
                }
            }
            MediaEvent::Playing => self.is_playing = true,
            MediaEvent::Paused | MediaEvent::Ended => self.is_playing = false,
        }
    }
}

/// Format seconds as `m:ss`
pub fn format_clock(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

struct Binding<E> {
    element: Arc<E>,
    _subscription: Subscription,
}

/// Transport operations over a host media element
pub struct PlaybackController<E: MediaElement> {
    state: Arc<Mutex<PlaybackState>>,
    binding: Mutex<Option<Binding<E>>>,
    /// Bumped whenever the bound element changes
    attachment: Arc<AtomicU64>,
    revision: Revision,
}

impl<E: MediaElement> PlaybackController<E> {
    /// Create a controller with no element attached
    pub fn new() -> Self {
        Self::with_revision(Revision::new())
    }

    pub(crate) fn with_revision(revision: Revision) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlaybackState::default())),
            binding: Mutex::new(None),
            attachment: Arc::new(AtomicU64::new(0)),
            revision,
        }
    }

    /// Bind to `element`, replacing any previous one.
    ///
    /// The previous element's listener is detached before the new one is
    /// registered, and playback state starts over.
    pub fn attach(&self, element: Arc<E>) {
        self.detach();
        self.attachment.fetch_add(1, Ordering::SeqCst);
        *self.state.lock() = PlaybackState::default();

        let listener = self.listener();
        let subscription = element.subscribe(listener);
        *self.binding.lock() = Some(Binding {
            element: element.clone(),
            _subscription: subscription,
        });

        element.load();
        self.revision.bump();
        tracing::debug!("Media element attached");
    }

    /// Unbind the current element, if any
    pub fn detach(&self) {
        let previous = self.binding.lock().take();
        if previous.is_some() {
            self.attachment.fetch_add(1, Ordering::SeqCst);
            drop(previous);
            self.revision.bump();
            tracing::debug!("Media element detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.binding.lock().is_some()
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    /// Watch for state changes
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Play if paused, pause otherwise.
    ///
    /// Returns the task awaiting the host's play request, if one was issued.
    /// Must be called inside a tokio runtime.
    pub fn toggle_play_pause(&self) -> Option<JoinHandle<()>> {
        let element = self.element()?;
        if element.is_paused() {
            Some(self.request_play(&element))
        } else {
            self.request_pause(&element);
            None
        }
    }

    /// Start playback. A rejected request is logged and swallowed.
    pub fn play(&self) -> Option<JoinHandle<()>> {
        let element = self.element()?;
        Some(self.request_play(&element))
    }

    pub fn pause(&self) {
        if let Some(element) = self.element() {
            self.request_pause(&element);
        }
    }

    /// Jump to `percentage` of the duration. No-op until the duration is
    /// known. The percentage comes from `ProgressTrack`, which already
    /// clamps it to 0-100.
    pub fn seek(&self, percentage: f64) {
        let Some(element) = self.element() else {
            return;
        };
        let Some(duration) = self.state().duration else {
            return;
        };
        if !percentage.is_finite() {
            return;
        }
        element.set_current_time(percentage / 100.0 * duration);
    }

    /// Move by `delta` seconds from the element's position, clamped to
    /// `[0, duration]`. No-op until the duration is known.
    pub fn seek_relative(&self, delta: f64) {
        let Some(element) = self.element() else {
            return;
        };
        let Some(duration) = self.state().duration else {
            return;
        };
        let target = (element.current_time() + delta).clamp(0.0, duration);
        element.set_current_time(target);
    }

    pub fn set_muted(&self, muted: bool) {
        if let Some(element) = self.element() {
            element.set_muted(muted);
        }
    }

    fn element(&self) -> Option<Arc<E>> {
        self.binding.lock().as_ref().map(|b| b.element.clone())
    }

    fn listener(&self) -> MediaListener {
        let state = Arc::downgrade(&self.state);
        let revision = self.revision.clone();
        Arc::new(move |event: MediaEvent| {
            if let Some(state) = state.upgrade() {
                state.lock().apply(event);
                revision.bump();
            }
        })
    }

    fn request_play(&self, element: &Arc<E>) -> JoinHandle<()> {
        let request = element.play();
        self.set_playing(true);

        let state: Weak<Mutex<PlaybackState>> = Arc::downgrade(&self.state);
        let element = Arc::downgrade(element);
        let revision = self.revision.clone();
        let attachment = self.attachment.clone();
        let epoch = attachment.load(Ordering::SeqCst);
        tokio::spawn(async move {
            if let Err(e) = request.await {
                tracing::warn!("Play request rejected: {}", e);
                let (Some(state), Some(element)) = (state.upgrade(), element.upgrade()) else {
                    return;
                };
                let mut state = state.lock();
                // The element was swapped out; its state is no longer ours
                if attachment.load(Ordering::SeqCst) != epoch {
                    return;
                }
                state.is_playing = !element.is_paused();
                drop(state);
                revision.bump();
            }
        })
    }

    fn request_pause(&self, element: &Arc<E>) {
        element.pause();
        self.set_playing(false);
    }

    fn set_playing(&self, playing: bool) {
        self.state.lock().is_playing = playing;
        self.revision.bump();
    }
}

impl<E: MediaElement> Default for PlaybackController<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::FakeMedia;

    fn attached(duration: Option<f64>) -> (PlaybackController<FakeMedia>, Arc<FakeMedia>) {
        let controller = PlaybackController::new();
        let media = Arc::new(FakeMedia::new());
        controller.attach(media.clone());
        if let Some(duration) = duration {
            media.emit(MediaEvent::MetadataLoaded { duration });
        }
        (controller, media)
    }

    #[test]
    fn test_state_apply_metadata_and_time() {
        let mut state = PlaybackState::default();
        state.apply(MediaEvent::TimeUpdate { current_time: 3.0 });
        state.apply(MediaEvent::MetadataLoaded { duration: 100.0 });
        assert_eq!(state.duration, Some(100.0));
        assert_eq!(state.current_time, 0.0);

        state.apply(MediaEvent::TimeUpdate { current_time: 250.0 });
        assert_eq!(state.current_time, 100.0);
        state.apply(MediaEvent::TimeUpdate { current_time: -1.0 });
        assert_eq!(state.current_time, 0.0);
        state.apply(MediaEvent::TimeUpdate { current_time: f64::NAN });
        assert_eq!(state.current_time, 0.0);
    }

    #[test]
    fn test_non_finite_duration_is_unknown() {
        let mut state = PlaybackState::default();
        state.apply(MediaEvent::MetadataLoaded { duration: f64::INFINITY });
        assert_eq!(state.duration, None);
        assert_eq!(state.progress_percentage(), 0.0);
        assert_eq!(state.time_label(), None);
    }

    #[test]
    fn test_progress_and_label() {
        let state = PlaybackState {
            is_playing: true,
            duration: Some(200.0),
            current_time: 65.4,
        };
        assert!((state.progress_percentage() - 32.7).abs() < 1e-9);
        assert_eq!(state.time_label().as_deref(), Some("1:05 / 3:20"));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(600.0), "10:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
    }

    #[tokio::test]
    async fn test_toggle_issues_one_request_each_way() {
        let (controller, media) = attached(Some(100.0));

        let pending = controller.toggle_play_pause();
        assert!(controller.state().is_playing);
        assert_eq!(media.play_requests(), 1);
        pending.unwrap().await.unwrap();

        assert!(controller.toggle_play_pause().is_none());
        assert!(!controller.state().is_playing);
        assert_eq!(media.pause_requests(), 1);
        assert_eq!(media.play_requests(), 1);
    }

    #[tokio::test]
    async fn test_rejected_play_is_reconciled() {
        let (controller, media) = attached(Some(100.0));
        media.reject_play(true);

        let pending = controller.toggle_play_pause().unwrap();
        assert!(controller.state().is_playing);
        pending.await.unwrap();

        assert!(!controller.state().is_playing);
        assert!(media.is_paused());
    }

    #[tokio::test]
    async fn test_stale_rejection_ignored_after_reattach() {
        let (controller, first) = attached(Some(100.0));
        first.reject_play(true);
        let pending = controller.toggle_play_pause().unwrap();

        let second = Arc::new(FakeMedia::new());
        controller.attach(second.clone());
        second.emit(MediaEvent::Playing);
        pending.await.unwrap();

        assert!(controller.state().is_playing);
        assert!(first.is_paused());
    }

    #[tokio::test]
    async fn test_host_events_are_authoritative() {
        let (controller, media) = attached(Some(100.0));
        media.emit(MediaEvent::Playing);
        assert!(controller.state().is_playing);
        media.emit(MediaEvent::Ended);
        assert!(!controller.state().is_playing);
    }

    #[test]
    fn test_seek_percentage() {
        let (controller, media) = attached(Some(100.0));
        controller.seek(50.0);
        assert_eq!(media.current_time(), 50.0);
        controller.seek(100.0);
        assert_eq!(media.current_time(), 100.0);
        controller.seek(f64::NAN);
        assert_eq!(media.current_time(), 100.0);
    }

    #[test]
    fn test_seek_without_duration_is_noop() {
        let (controller, media) = attached(None);
        media.set_current_time(7.0);
        controller.seek(50.0);
        assert_eq!(media.current_time(), 7.0);
        controller.seek_relative(5.0);
        assert_eq!(media.current_time(), 7.0);
    }

    #[test]
    fn test_seek_relative_clamps() {
        let (controller, media) = attached(Some(30.0));
        media.set_current_time(28.0);
        controller.seek_relative(5.0);
        assert_eq!(media.current_time(), 30.0);
        media.set_current_time(2.0);
        controller.seek_relative(-5.0);
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn test_detached_controller_is_inert() {
        let controller: PlaybackController<FakeMedia> = PlaybackController::new();
        assert!(controller.toggle_play_pause().is_none());
        controller.seek(10.0);
        controller.set_muted(true);
        assert_eq!(controller.state(), PlaybackState::default());
    }

    #[test]
    fn test_attach_replaces_listener() {
        let (controller, first) = attached(Some(100.0));
        assert_eq!(first.listener_count(), 1);

        let second = Arc::new(FakeMedia::new());
        controller.attach(second.clone());
        assert_eq!(first.listener_count(), 0);
        assert_eq!(second.listener_count(), 1);
        assert_eq!(second.load_count(), 1);

        // Events from the old element no longer reach the controller
        first.emit(MediaEvent::TimeUpdate { current_time: 42.0 });
        assert_eq!(controller.state().current_time, 0.0);

        controller.detach();
        assert_eq!(second.listener_count(), 0);
    }

    #[test]
    fn test_changes_are_signalled() {
        let (controller, media) = attached(Some(10.0));
        let rx = controller.changes();
        let before = *rx.borrow();
        media.emit(MediaEvent::TimeUpdate { current_time: 1.0 });
        assert!(*rx.borrow() > before);
    }
}
