//! Test fixtures
//!
//! Stand-ins for the host side of the engine, so the controller and the
//! player can be driven without a browser.

use futures_util::future::{self, BoxFuture};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PlayerError, Result};
use crate::interaction::fullscreen::FullscreenTarget;
use crate::media::element::{MediaElement, MediaEvent, MediaListener, Subscription};
use crate::subtitle::fetch::SubtitleFetcher;

pub const ENG_VTT: &str = "WEBVTT\n\n\
00:00:01.000 --> 00:00:04.000\nHello there\n\n\
00:00:05.000 --> 00:00:08.000\nSecond line\nwraps here\n";

pub const SPA_VTT: &str = "WEBVTT\n\n\
00:00:01.000 --> 00:00:04.000\nHola\n";

type Listeners = Arc<Mutex<Vec<(u64, MediaListener)>>>;

#[derive(Debug)]
struct MediaState {
    paused: bool,
    current_time: f64,
    muted: bool,
    reject_play: bool,
}

/// Scriptable media element.
///
/// Records every request the controller makes. It never emits events on
/// its own; tests call [`FakeMedia::emit`] to play the host's part.
pub struct FakeMedia {
    state: Mutex<MediaState>,
    listeners: Listeners,
    next_listener: AtomicU64,
    play_requests: AtomicUsize,
    pause_requests: AtomicUsize,
    loads: AtomicUsize,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MediaState {
                paused: true,
                current_time: 0.0,
                muted: false,
                reject_play: false,
            }),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(0),
            play_requests: AtomicUsize::new(0),
            pause_requests: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    /// Deliver `event` to every subscribed listener
    pub fn emit(&self, event: MediaEvent) {
        let listeners: Vec<MediaListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Make subsequent play requests fail like a blocked autoplay
    pub fn reject_play(&self, reject: bool) {
        self.state.lock().reject_play = reject;
    }

    pub fn play_requests(&self) -> usize {
        self.play_requests.load(Ordering::SeqCst)
    }

    pub fn pause_requests(&self) -> usize {
        self.pause_requests.load(Ordering::SeqCst)
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_muted(&self) -> bool {
        self.state.lock().muted
    }
}

impl MediaElement for FakeMedia {
    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn play(&self) -> BoxFuture<'static, Result<()>> {
        self.play_requests.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let result = if state.reject_play {
            Err(PlayerError::PlayRejected("autoplay blocked".to_string()))
        } else {
            state.paused = false;
            Ok(())
        };
        Box::pin(future::ready(result))
    }

    fn pause(&self) {
        self.pause_requests.fetch_add(1, Ordering::SeqCst);
        self.state.lock().paused = true;
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn set_current_time(&self, secs: f64) {
        self.state.lock().current_time = secs;
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().muted = muted;
    }

    fn load(&self) {
        self.loads.fetch_add(1, Ordering::SeqCst);
    }

    fn subscribe(&self, listener: MediaListener) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push((id, listener));

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.lock().retain(|(other, _)| *other != id);
            }
        })
    }
}

/// Fullscreen container that counts requests. Clones share counters.
#[derive(Clone, Default)]
pub struct FakeFullscreen {
    requests: Arc<AtomicUsize>,
    exits: Arc<AtomicUsize>,
    fail: Arc<Mutex<bool>>,
}

impl FakeFullscreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn exits(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }
}

impl FullscreenTarget for FakeFullscreen {
    fn request_fullscreen(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock() {
            return Err(PlayerError::Fullscreen("permission denied".to_string()));
        }
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<()> {
        self.exits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Subtitle sources served from memory
#[derive(Default)]
pub struct MemoryFetcher {
    sources: HashMap<String, (String, Option<Duration>)>,
    requests: AtomicUsize,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, text: &str) -> Self {
        self.sources
            .insert(location.to_string(), (text.to_string(), None));
        self
    }

    /// Serve `text` only after `delay_ms` of (tokio) time
    pub fn with_delayed(mut self, location: &str, text: &str, delay_ms: u64) -> Self {
        self.sources.insert(
            location.to_string(),
            (text.to_string(), Some(Duration::from_millis(delay_ms))),
        );
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl SubtitleFetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let (text, delay) = self
            .sources
            .get(location)
            .cloned()
            .ok_or_else(|| PlayerError::HttpStatus {
                location: location.to_string(),
                status: 404,
            })?;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(text)
    }
}
