//! The queue store backing pushq.
//!
//! The store is a plain FIFO: `enqueue` appends at the tail, the dispatcher
//! pops from the head and, on retry, appends the same entry at the tail again.
//! A retried entry therefore goes to the back of the line behind everything
//! that was waiting.
//!
//! Store operations are synchronous and O(1). Enqueue never suspends, and the
//! dispatcher never holds the lock across an `.await`.
//!
//! # Examples
//!
//! ```rust
//! use pushq::queue::{InMemoryStore, TaskStore};
//! use pushq::task::{TaskEntry, TaskOptions};
//!
//! let store = InMemoryStore::new();
//! store.push_back(TaskEntry::new(None, TaskOptions::new("/a")));
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.pop_front().unwrap().options.url, "/a");
//! assert!(store.is_empty());
//! ```

use crate::task::TaskEntry;

pub mod memory;
pub use memory::InMemoryStore;

/// Statistics about the queue state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Entries currently waiting
    pub pending: u64,
    /// Entries accepted through `enqueue` since creation
    pub total_enqueued: u64,
    /// Entries pushed back for another attempt
    pub requeued: u64,
}

/// Trait that queue stores must implement.
///
/// There is no capacity bound and no error path: a store always accepts.
pub trait TaskStore: Send + Sync {
    /// Append a newly accepted entry at the tail.
    fn push_back(&self, entry: TaskEntry);

    /// Append an entry that is being retried at the tail.
    ///
    /// Same placement as `push_back`; kept separate so stores can count retries.
    fn requeue(&self, entry: TaskEntry);

    /// Remove and return the head entry, or `None` when empty.
    fn pop_front(&self) -> Option<TaskEntry>;

    /// Number of waiting entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get queue statistics
    fn stats(&self) -> QueueStats;
}

/// Convenient type alias for a shared queue store
pub type SharedStore = std::sync::Arc<dyn TaskStore>;
