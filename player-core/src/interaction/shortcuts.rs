//! Window-level keyboard shortcut table
//!
//! A page has one keyboard listener but may mount several players. The hub
//! is that listener: players register on mount, deregister when their
//! registration guard drops, and the host forwards every key press to
//! [`ShortcutHub::dispatch`].

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::input::{KeyHandling, KeyPress};

/// Identity of a mounted player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Key handler registered by one player
pub type KeyHandler = Arc<dyn Fn(&KeyPress) -> KeyHandling + Send + Sync>;

#[derive(Clone, Default)]
pub struct ShortcutHub {
    handlers: Arc<DashMap<PlayerId, KeyHandler>>,
}

impl ShortcutHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `id`. Replaces an earlier handler for the
    /// same id.
    pub fn register(&self, id: PlayerId, handler: KeyHandler) -> ShortcutRegistration {
        self.handlers.insert(id, handler);
        tracing::debug!(player = %id, "Keyboard shortcuts registered");
        ShortcutRegistration {
            id,
            handlers: self.handlers.clone(),
        }
    }

    /// Forward a key press to every mounted player
    pub fn dispatch(&self, press: &KeyPress) -> KeyHandling {
        // Handlers may drop a player (and with it a registration), so do
        // not call them while holding map shards.
        let handlers: Vec<KeyHandler> = self
            .handlers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut handling = KeyHandling::Ignored;
        for handler in handlers {
            if handler(press).is_handled() {
                handling = KeyHandling::PreventDefault;
            }
        }
        handling
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ShortcutHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutHub")
            .field("players", &self.handlers.len())
            .finish()
    }
}

/// Live registration in a [`ShortcutHub`]. Dropping it deregisters.
pub struct ShortcutRegistration {
    id: PlayerId,
    handlers: Arc<DashMap<PlayerId, KeyHandler>>,
}

impl ShortcutRegistration {
    pub fn id(&self) -> PlayerId {
        self.id
    }
}

impl Drop for ShortcutRegistration {
    fn drop(&mut self) {
        self.handlers.remove(&self.id);
        tracing::debug!(player = %self.id, "Keyboard shortcuts deregistered");
    }
}

impl fmt::Debug for ShortcutRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutRegistration")
            .field("id", &self.id)
            .finish()
    }
}
