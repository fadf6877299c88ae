//! Core systems for Quill.
//!
//! This crate provides the event-loop primitives the Quill text editing
//! engine is built on:
//!
//! - **Timers**: one-shot and repeating timers that produce queued events
//! - **Event Loop**: a prioritized event queue driven by the host
//! - **Task Queue**: callbacks deferred to a later turn of the loop
//! - **Signal/Slot System**: typed notifications
//! - **Logging**: tracing targets and a timing guard
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use quill_core::{CoreEvent, EventLoop, FireMode, Signal};
//!
//! let event_loop = EventLoop::new();
//! let ticked = Signal::<()>::new();
//! ticked.connect(|_| println!("tick"));
//!
//! let id = event_loop
//!     .timers()
//!     .start_repeating(Duration::from_millis(30), FireMode::Immediate)
//!     .unwrap();
//!
//! event_loop.poll(Instant::now());
//! while let Some(event) = event_loop.next_event() {
//!     if event == (CoreEvent::Timer { id }) {
//!         ticked.emit(());
//!     }
//! }
//! ```

mod error;
mod event;
mod event_loop;
pub mod logging;
pub mod signal;
mod task;
pub mod timer;

pub use error::{CoreError, Result, TimerError};
pub use event::{CoreEvent, EventPriority};
pub use event_loop::EventLoop;
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
pub use timer::{FireMode, TimerHandle, TimerId, TimerKind, TimerManager};
