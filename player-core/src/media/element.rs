//! Host media element seam
//!
//! The engine never decodes anything. It drives whatever the host provides
//! (an HTML video element behind wasm-bindgen, a native player, a
//! simulation) through this trait and listens to the events it emits.

use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Events a media element reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Metadata is available; duration may be non-finite for live sources
    MetadataLoaded { duration: f64 },
    /// Playback position changed (forwards, or backwards after a seek)
    TimeUpdate { current_time: f64 },
    /// Playback actually started
    Playing,
    /// Playback actually paused
    Paused,
    /// Playback reached the end of the media
    Ended,
}

/// Callback invoked for every media event
pub type MediaListener = Arc<dyn Fn(MediaEvent) + Send + Sync>;

/// A host media element
pub trait MediaElement: Send + Sync + 'static {
    fn is_paused(&self) -> bool;

    /// Ask the host to start playback. May resolve later, and may reject
    /// (for example when autoplay is blocked).
    fn play(&self) -> BoxFuture<'static, Result<()>>;

    fn pause(&self);

    fn current_time(&self) -> f64;

    fn set_current_time(&self, secs: f64);

    fn set_muted(&self, muted: bool);

    /// (Re)load the media source
    fn load(&self);

    /// Register a listener. It stays registered until the returned
    /// subscription is dropped.
    fn subscribe(&self, listener: MediaListener) -> Subscription;
}

/// Live event registration. Dropping it detaches the listener.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Detach now instead of on drop
    pub fn cancel(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
