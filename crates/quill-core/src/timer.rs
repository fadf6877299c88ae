//! Timer system for Quill.
//!
//! Provides one-shot and repeating timers that integrate with the event loop.
//! Timers never run code themselves: when one expires the manager produces a
//! [`CoreEvent::Timer`] which the event loop queues and the host dispatches
//! on the UI thread like any other event.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::event::CoreEvent;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// When a repeating timer fires for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FireMode {
    /// The first fire occurs one interval after the timer is started.
    #[default]
    AfterInterval,
    /// The first fire is due as soon as the timer is started.
    Immediate,
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should next fire.
    next_fire: Instant,
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages a set of timers.
pub struct TimerManager {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        self.insert(now + duration, duration, TimerKind::OneShot)
    }

    /// Start a repeating timer.
    ///
    /// With [`FireMode::Immediate`] the first fire is due at `now`; every later
    /// fire is scheduled one `interval` after the previous one was processed.
    pub fn start_repeating(
        &mut self,
        now: Instant,
        interval: Duration,
        mode: FireMode,
    ) -> Result<TimerId> {
        if interval.is_zero() {
            return Err(TimerError::ZeroInterval.into());
        }
        let first = match mode {
            FireMode::AfterInterval => now + interval,
            FireMode::Immediate => now,
        };
        Ok(self.insert(first, interval, TimerKind::Repeating))
    }

    fn insert(&mut self, next_fire: Instant, interval: Duration, kind: TimerKind) -> TimerId {
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
        });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });
        tracing::trace!(target: "quill_core::timer", ?id, ?kind, ?interval, "timer started");
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns an error if the timer is unknown (already stopped, or a
    /// one-shot timer that has fired).
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => {
                tracing::trace!(target: "quill_core::timer", ?id, "timer stopped");
                Ok(())
            }
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        // Drop queue entries of timers that were stopped.
        while let Some(entry) = self.queue.peek() {
            if self.is_live(entry) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    fn is_live(&self, entry: &TimerQueueEntry) -> bool {
        self.timers
            .get(entry.id)
            .is_some_and(|t| t.next_fire == entry.fire_time)
    }

    /// Process all timers due at or before `now`.
    ///
    /// Returns one timer event per fire, in fire-time order.
    #[tracing::instrument(skip(self), target = "quill_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<CoreEvent> {
        let mut events = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            if !self.is_live(&entry) {
                continue;
            }
            let id = entry.id;
            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };

            tracing::trace!(target: "quill_core::timer", ?id, "timer fired");
            events.push(CoreEvent::Timer { id });

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    self.queue.push(TimerQueueEntry {
                        id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        events
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle to a shared [`TimerManager`].
///
/// The event loop owns the manager; skins receive a handle so they can start
/// and cancel their own timers.
#[derive(Clone, Default)]
pub struct TimerHandle {
    inner: Arc<Mutex<TimerManager>>,
}

impl TimerHandle {
    /// Create a handle around a fresh manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer firing after `duration`.
    pub fn start_one_shot(&self, duration: Duration) -> TimerId {
        self.inner.lock().start_one_shot(Instant::now(), duration)
    }

    /// Start a repeating timer. See [`TimerManager::start_repeating`].
    pub fn start_repeating(&self, interval: Duration, mode: FireMode) -> Result<TimerId> {
        self.inner
            .lock()
            .start_repeating(Instant::now(), interval, mode)
    }

    /// Stop a timer.
    pub fn stop(&self, id: TimerId) -> Result<()> {
        self.inner.lock().stop(id)
    }

    /// Check whether a timer is active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    /// Time until the next timer is due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.inner.lock().time_until_next(now)
    }

    /// Collect the events of every timer due at or before `now`.
    pub fn process_expired(&self, now: Instant) -> Vec<CoreEvent> {
        self.inner.lock().process_expired(now)
    }

    /// Number of active timers.
    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }
}
