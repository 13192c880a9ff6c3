//! Simulated media element
//!
//! Stands in for a `<video>` tag: keeps a clock that advances while
//! playing and emits the same events a browser would.

use futures_util::future::{self, BoxFuture};
use parking_lot::Mutex;
use player_core::{MediaElement, MediaEvent, MediaListener, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

type Listeners = Arc<Mutex<Vec<(u64, MediaListener)>>>;

#[derive(Debug)]
struct Clock {
    paused: bool,
    ended: bool,
    current_time: f64,
}

pub struct SimulatedMedia {
    duration: f64,
    clock: Mutex<Clock>,
    listeners: Listeners,
    next_listener: AtomicU64,
}

impl SimulatedMedia {
    pub fn new(duration_secs: f64) -> Self {
        let duration = if duration_secs.is_nan() {
            0.0
        } else {
            duration_secs.max(0.0)
        };
        Self {
            duration,
            clock: Mutex::new(Clock {
                paused: true,
                ended: false,
                current_time: 0.0,
            }),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(0),
        }
    }

    pub fn is_ended(&self) -> bool {
        self.clock.lock().ended
    }

    /// Drive the clock every `tick` until the media is dropped
    pub fn spawn_clock(self: &Arc<Self>, tick: Duration) -> JoinHandle<()> {
        let media: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + tick;
            let mut interval = tokio::time::interval_at(start, tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(media) = media.upgrade() else {
                    break;
                };
                media.advance(tick.as_secs_f64());
            }
        })
    }

    /// Move the clock forward by `secs` if playing
    pub fn advance(&self, secs: f64) {
        let events = {
            let mut clock = self.clock.lock();
            if clock.paused {
                return;
            }
            clock.current_time = (clock.current_time + secs).min(self.duration);
            let mut events = vec![MediaEvent::TimeUpdate {
                current_time: clock.current_time,
            }];
            if clock.current_time >= self.duration {
                clock.paused = true;
                clock.ended = true;
                events.push(MediaEvent::Paused);
                events.push(MediaEvent::Ended);
            }
            events
        };
        for event in events {
            self.emit(event);
        }
    }

    // Listeners may call back into the element, so never emit under a lock
    fn emit(&self, event: MediaEvent) {
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
}

impl MediaElement for SimulatedMedia {
    fn is_paused(&self) -> bool {
        self.clock.lock().paused
    }

    fn play(&self) -> BoxFuture<'static, player_core::Result<()>> {
        let restarted = {
            let mut clock = self.clock.lock();
            let restarted = clock.ended;
            if clock.ended {
                clock.ended = false;
                clock.current_time = 0.0;
            }
            clock.paused = false;
            restarted
        };
        if restarted {
            self.emit(MediaEvent::TimeUpdate { current_time: 0.0 });
        }
        self.emit(MediaEvent::Playing);
        Box::pin(future::ready(Ok(())))
    }

    fn pause(&self) {
        let was_playing = {
            let mut clock = self.clock.lock();
            !std::mem::replace(&mut clock.paused, true)
        };
        if was_playing {
            self.emit(MediaEvent::Paused);
        }
    }

    fn current_time(&self) -> f64 {
        self.clock.lock().current_time
    }

    fn set_current_time(&self, secs: f64) {
        let current_time = {
            let mut clock = self.clock.lock();
            clock.current_time = secs.clamp(0.0, self.duration);
            clock.ended = false;
            clock.current_time
        };
        tracing::debug!(to = %player_core::format_timestamp(current_time), "Seek");
        self.emit(MediaEvent::TimeUpdate { current_time });
    }

    // No audio to silence
    fn set_muted(&self, muted: bool) {
        tracing::debug!(muted, "Mute changed");
    }

    fn load(&self) {
        {
            let mut clock = self.clock.lock();
            clock.current_time = 0.0;
            clock.ended = false;
        }
        self.emit(MediaEvent::MetadataLoaded {
            duration: self.duration,
        });
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

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(media: &SimulatedMedia) -> (Arc<Mutex<Vec<MediaEvent>>>, Subscription) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let subscription = media.subscribe(Arc::new(move |event: MediaEvent| {
            sink.lock().push(event);
        }));
        (events, subscription)
    }

    #[test]
    fn test_load_reports_metadata() {
        let media = SimulatedMedia::new(30.0);
        let (events, _sub) = recorded(&media);
        media.load();
        assert_eq!(
            *events.lock(),
            vec![MediaEvent::MetadataLoaded { duration: 30.0 }]
        );
    }

    #[test]
    fn test_clock_only_moves_while_playing() {
        let media = SimulatedMedia::new(30.0);
        media.advance(1.0);
        assert_eq!(media.current_time(), 0.0);

        let _ = media.play();
        media.advance(1.5);
        assert_eq!(media.current_time(), 1.5);

        media.pause();
        media.advance(1.0);
        assert_eq!(media.current_time(), 1.5);
    }

    #[test]
    fn test_reaching_the_end() {
        let media = SimulatedMedia::new(2.0);
        let (events, _sub) = recorded(&media);
        let _ = media.play();
        media.advance(5.0);

        assert!(media.is_ended());
        assert!(media.is_paused());
        assert_eq!(
            events.lock().last().copied(),
            Some(MediaEvent::Ended)
        );

        // Playing again starts over
        let _ = media.play();
        assert_eq!(media.current_time(), 0.0);
        assert!(!media.is_ended());
    }

    #[test]
    fn test_unsubscribe_on_drop() {
        let media = SimulatedMedia::new(10.0);
        let (events, sub) = recorded(&media);
        drop(sub);
        media.set_current_time(4.0);
        assert!(events.lock().is_empty());
        assert_eq!(media.current_time(), 4.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_clock_advances() {
        let media = Arc::new(SimulatedMedia::new(10.0));
        let _ = media.play();
        let clock = media.spawn_clock(Duration::from_millis(250));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(media.current_time(), 1.0);
        clock.abort();
    }
}
