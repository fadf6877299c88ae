//! A headless, single-threaded event loop.
//!
//! The loop does not own a window or talk to the platform. The host drives it:
//! each turn it calls [`EventLoop::poll`] to move expired timers into the
//! queue, drains events with [`EventLoop::next_event`] and dispatches them to
//! its widgets, then runs deferred tasks with [`EventLoop::run_deferred_tasks`].
//! All state changes triggered by timers therefore happen during ordinary
//! event dispatch on the UI thread.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use quill_core::{CoreEvent, EventLoop, FireMode};
//!
//! let event_loop = EventLoop::new();
//! let blink = event_loop
//!     .timers()
//!     .start_repeating(Duration::from_millis(600), FireMode::Immediate)
//!     .unwrap();
//!
//! event_loop.poll(Instant::now());
//! assert_eq!(event_loop.next_event(), Some(CoreEvent::Timer { id: blink }));
//! ```

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{CoreError, Result};
use crate::event::{CoreEvent, PrioritizedEvent};
use crate::task::{TaskId, TaskQueue};
use crate::timer::TimerHandle;

/// The event queue, timer set and deferred task queue of one UI thread.
pub struct EventLoop {
    timers: TimerHandle,
    tasks: Mutex<TaskQueue>,
    queue: Mutex<BinaryHeap<PrioritizedEvent>>,
    sequence: AtomicU64,
    quit_requested: AtomicBool,
}

impl EventLoop {
    /// Create an empty event loop.
    pub fn new() -> Self {
        Self {
            timers: TimerHandle::new(),
            tasks: Mutex::new(TaskQueue::new()),
            queue: Mutex::new(BinaryHeap::new()),
            sequence: AtomicU64::new(0),
            quit_requested: AtomicBool::new(false),
        }
    }

    /// A handle to this loop's timers, for widgets that own timers.
    pub fn timers(&self) -> TimerHandle {
        self.timers.clone()
    }

    /// Queue an event for dispatch.
    pub fn post_event(&self, event: CoreEvent) -> Result<()> {
        if self.should_quit() {
            return Err(CoreError::EventLoopExited);
        }
        self.queue_event(event);
        Ok(())
    }

    fn queue_event(&self, event: CoreEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.queue
            .lock()
            .push(PrioritizedEvent::new(event, sequence));
    }

    /// Post a callback to run on a later turn of the loop.
    pub fn post_task<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.lock().post(task)
    }

    /// Cancel a deferred task that has not run yet.
    pub fn cancel_task(&self, id: TaskId) -> bool {
        self.tasks.lock().cancel(id)
    }

    /// Whether deferred tasks are waiting.
    pub fn has_pending_tasks(&self) -> bool {
        self.tasks.lock().has_pending()
    }

    /// Move every timer due at or before `now` into the event queue.
    ///
    /// Returns the number of timer events queued.
    #[tracing::instrument(skip(self), target = "quill_core::event_loop", level = "trace")]
    pub fn poll(&self, now: Instant) -> usize {
        let events = self.timers.process_expired(now);
        let count = events.len();
        for event in events {
            self.queue_event(event);
        }
        count
    }

    /// Pop the next event, highest priority first.
    pub fn next_event(&self) -> Option<CoreEvent> {
        self.queue.lock().pop().map(|e| e.event)
    }

    /// Number of events waiting for dispatch.
    pub fn pending_events(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run one batch of deferred tasks.
    ///
    /// Returns the number of tasks run. Tasks posted by these tasks wait for
    /// the next call.
    pub fn run_deferred_tasks(&self) -> usize {
        let batch = self.tasks.lock().take_batch();
        let count = batch.len();
        for task in batch {
            task();
        }
        if count > 0 {
            tracing::trace!(target: "quill_core::event_loop", count, "ran deferred tasks");
        }
        count
    }

    /// How long the host may sleep before the next timer is due.
    pub fn time_until_next_timer(&self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Ask the loop to stop accepting events.
    pub fn quit(&self) {
        if !self.quit_requested.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: "quill_core::event_loop", "quit requested");
            self.queue_event(CoreEvent::Quit);
        }
    }

    /// Whether [`quit`](Self::quit) has been called.
    pub fn should_quit(&self) -> bool {
        self.quit_requested.load(Ordering::SeqCst)
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(EventLoop: Send, Sync);
