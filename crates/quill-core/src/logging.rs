//! Logging facilities for Quill.
//!
//! Quill uses the `tracing` crate for instrumentation. To see logs, install a
//! subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("quill::layout=trace,quill::skin=debug")
//!     .init();
//! ```

use std::time::Instant;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Timer system target.
    pub const TIMER: &str = "quill_core::timer";
    /// Event loop target.
    pub const EVENT_LOOP: &str = "quill_core::event_loop";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "quill_core::signal";
    /// Text mutation gate target.
    pub const DOCUMENT: &str = "quill::document";
    /// Line-breaking layout target.
    pub const LAYOUT: &str = "quill::layout";
    /// Input controller (skin) target.
    pub const SKIN: &str = "quill::skin";
    /// Clipboard access target.
    pub const CLIPBOARD: &str = "quill::clipboard";
}

/// A guard that logs how long a section of code took when dropped.
///
/// Timing is reported at `trace` level, so it costs almost nothing unless a
/// subscriber enables it.
///
/// ```
/// use quill_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("layout paragraph");
///     // ... measured work ...
/// }
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    name: &'static str,
    start: Instant,
}

impl PerfSpan {
    /// Start timing a named section.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Time elapsed since the span started, in microseconds.
    pub fn elapsed_micros(&self) -> u128 {
        self.start.elapsed().as_micros()
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::trace!(
            target: "quill_core::perf",
            name = self.name,
            elapsed_us = self.elapsed_micros() as u64,
            "section finished"
        );
    }
}
