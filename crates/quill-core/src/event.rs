//! Event types for the Quill event queue.

use crate::timer::TimerId;

/// Priority levels for queued events.
/// Higher priority events are processed first within the same turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum EventPriority {
    /// Lowest priority - idle work.
    Low = 0,
    /// Normal priority - most application events.
    #[default]
    Normal = 1,
    /// High priority - user input, timers.
    High = 2,
    /// Critical priority - shutdown.
    Critical = 3,
}

/// Events dispatched through the Quill event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// A timer has fired.
    Timer {
        /// The timer that fired.
        id: TimerId,
    },

    /// Request to quit the event loop.
    Quit,

    /// Wake up the event loop.
    WakeUp,

    /// User-defined custom event.
    Custom {
        /// User-defined event kind identifier.
        kind: u32,
    },
}

impl CoreEvent {
    /// Get the priority of this event.
    pub fn priority(&self) -> EventPriority {
        match self {
            Self::Quit => EventPriority::Critical,
            Self::Timer { .. } => EventPriority::High,
            Self::WakeUp | Self::Custom { .. } => EventPriority::Normal,
        }
    }
}

/// A wrapper for prioritized events used in the internal queue.
#[derive(Debug)]
pub(crate) struct PrioritizedEvent {
    pub event: CoreEvent,
    pub priority: EventPriority,
    /// Sequence number for stable ordering of same-priority events.
    pub sequence: u64,
}

impl PrioritizedEvent {
    pub fn new(event: CoreEvent, sequence: u64) -> Self {
        let priority = event.priority();
        Self {
            event,
            priority,
            sequence,
        }
    }
}

impl PartialEq for PrioritizedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for PrioritizedEvent {}

impl PartialOrd for PrioritizedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrioritizedEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Higher priority first, then older (lower sequence) first.
        match self.priority.cmp(&other.priority) {
            std::cmp::Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}
