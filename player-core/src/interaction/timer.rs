//! Single-owner cancellable timers
//!
//! Used for the controls auto-hide countdown and the center icon flash.
//! Arming a slot always cancels what it had pending, and dropping the slot
//! cancels it too, so a timer never outlives the player that set it.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Epoch handed to a timer callback. The callback must check it with
/// [`TimerSlot::is_current`] before acting.
pub type TimerEpoch = u64;

#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<JoinHandle<()>>,
    epoch: TimerEpoch,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is pending and schedule `on_fire` after `delay`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce(TimerEpoch) + Send + 'static,
    {
        self.cancel();
        self.epoch = self.epoch.wrapping_add(1);
        let epoch = self.epoch;
        // The countdown starts now, not when the task is first polled
        let deadline = Instant::now() + delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_fire(epoch);
        }));
    }

    /// Cancel the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True if `epoch` belongs to the timer this slot is still waiting on.
    ///
    /// Guards against an expiry that was already running when the slot was
    /// re-armed or cancelled.
    pub fn is_current(&self, epoch: TimerEpoch) -> bool {
        self.pending.is_some() && self.epoch == epoch
    }

    /// Mark the current timer as fired
    pub fn complete(&mut self, epoch: TimerEpoch) -> bool {
        if self.is_current(epoch) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
