//! In-memory queue store.
//!
//! Entries live in a `VecDeque` behind a mutex. Nothing survives a restart.
//! Growth is unbounded: a producer that outpaces delivery grows the queue
//! without limit.

use super::{QueueStats, TaskStore};
use crate::task::TaskEntry;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    entries: VecDeque<TaskEntry>,
    total_enqueued: u64,
    requeued: u64,
}

/// In-memory FIFO store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskStore for InMemoryStore {
    fn push_back(&self, entry: TaskEntry) {
        let mut inner = self.lock();
        tracing::debug!(task_id = %entry.id, url = %entry.options.url, "Enqueued task");
        inner.entries.push_back(entry);
        inner.total_enqueued += 1;
    }

    fn requeue(&self, entry: TaskEntry) {
        let mut inner = self.lock();
        inner.entries.push_back(entry);
        inner.requeued += 1;
    }

    fn pop_front(&self) -> Option<TaskEntry> {
        self.lock().entries.pop_front()
    }

    fn len(&self) -> usize {
        self.lock().entries.len()
    }

    fn stats(&self) -> QueueStats {
        let inner = self.lock();
        QueueStats {
            pending: inner.entries.len() as u64,
            total_enqueued: inner.total_enqueued,
            requeued: inner.requeued,
        }
    }
}
