//! Change notification for the render layer

use std::sync::Arc;
use tokio::sync::watch;

/// Monotonic revision counter shared by everything that mutates player
/// state. The render layer watches it and re-reads the snapshot.
#[derive(Debug, Clone)]
pub(crate) struct Revision(Arc<watch::Sender<u64>>);

impl Revision {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self(Arc::new(tx))
    }

    pub(crate) fn bump(&self) {
        self.0.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.0.subscribe()
    }

    pub(crate) fn current(&self) -> u64 {
        *self.0.borrow()
    }
}
