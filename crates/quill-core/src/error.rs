//! Error types for the Quill core.

use thiserror::Error;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Timer-related error.
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),

    /// The event loop has been asked to quit and no longer accepts events.
    #[error("the event loop has already exited")]
    EventLoopExited,
}

/// Timer-specific errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    #[error("invalid or expired timer ID")]
    InvalidTimerId,

    /// A repeating timer was started with a zero interval.
    #[error("repeating timers need a non-zero interval")]
    ZeroInterval,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
