//! Deferred task queue.
//!
//! Tasks posted here run on a later turn of the event loop, on the UI
//! thread, after the events already queued for the current turn.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// Manages the deferred task queue.
pub struct TaskQueue {
    tasks: VecDeque<TaskData>,
    /// Maximum number of tasks to process per batch.
    batch_size: usize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self::with_batch_size(10)
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// Post a task to run on a later turn.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take up to `batch_size` tasks off the front of the queue.
    ///
    /// The tasks are returned rather than run so the caller can release any
    /// lock around the queue first; a task may post further tasks.
    pub(crate) fn take_batch(&mut self) -> Vec<BoxedTask> {
        let count = self.tasks.len().min(self.batch_size);
        self.tasks.drain(..count).map(|t| t.task).collect()
    }

    /// Set the batch size.
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_cancel() {
        let mut queue = TaskQueue::new();
        let first = queue.post(|| {});
        let second = queue.post(|| {});
        assert_ne!(first, second);
        assert_eq!(queue.pending_count(), 2);

        assert!(queue.cancel(first));
        assert!(!queue.cancel(first));
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn test_batches_respect_size() {
        let mut queue = TaskQueue::with_batch_size(2);
        for _ in 0..5 {
            queue.post(|| {});
        }
        assert_eq!(queue.take_batch().len(), 2);
        assert_eq!(queue.take_batch().len(), 2);
        assert_eq!(queue.take_batch().len(), 1);
        assert!(!queue.has_pending());
    }
}
