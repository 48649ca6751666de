//! The push queue facade.
//!
//! [`PushQueue`] owns the queue store and the single dispatcher task. Callers
//! enqueue tasks at any time; once started, the dispatcher delivers them in
//! the background against the configured target.

use crate::config::PushqConfig;
use crate::delivery::{Deliverer, HttpDeliverer};
use crate::error::{PushqError, PushqResult};
use crate::queue::{InMemoryStore, QueueStats, SharedStore};
use crate::task::{Accepted, OriginContext, TaskEntry, TaskOptions};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub mod dispatcher;

pub use dispatcher::{DispatchState, DispatchStats, Dispatcher, Resolution};

struct RunningDispatcher {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// In-memory push task queue.
///
/// # Examples
///
/// ```rust,no_run
/// use pushq::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> PushqResult<()> {
///     let config = PushqConfig {
///         dispatch: DispatchConfig::configure("localhost", 8080, 2),
///         ..Default::default()
///     };
///     let queue = PushQueue::new(config)?;
///     queue.start().await?;
///
///     let accepted = queue.enqueue(None, TaskOptions::new("/tasks/send-mail").with_body("{}"));
///     println!("accepted {}", accepted.task_id);
///
///     queue.stop().await?;
///     Ok(())
/// }
/// ```
pub struct PushQueue {
    config: PushqConfig,
    store: SharedStore,
    deliverer: Arc<dyn Deliverer>,
    stats: Arc<Mutex<DispatchStats>>,
    running: Mutex<Option<RunningDispatcher>>,
}

impl PushQueue {
    /// Create a queue with an in-memory store and an HTTP deliverer.
    pub fn new(config: PushqConfig) -> PushqResult<Self> {
        let deliverer = HttpDeliverer::new(&config.dispatch)?;
        Self::with_parts(config, Arc::new(InMemoryStore::new()), Arc::new(deliverer))
    }

    /// Create a queue over a custom store and transport.
    ///
    /// Fails with [`PushqError::Config`] when `config` does not validate.
    pub fn with_parts(
        config: PushqConfig,
        store: SharedStore,
        deliverer: Arc<dyn Deliverer>,
    ) -> PushqResult<Self> {
        config.ensure_valid()?;
        Ok(Self {
            config,
            store,
            deliverer,
            stats: Arc::new(Mutex::new(DispatchStats::default())),
            running: Mutex::new(None),
        })
    }

    /// Accept a task for later delivery.
    ///
    /// Never fails and never waits. The returned [`Accepted`] means the task
    /// is in the store, not that it was delivered. `origin` is carried with
    /// the entry and never read.
    pub fn enqueue(&self, origin: Option<OriginContext>, options: TaskOptions) -> Accepted {
        let entry = TaskEntry::new(origin, options);
        let accepted = Accepted {
            task_id: entry.id.clone(),
            queue_name: entry.options.queue_name.clone(),
        };

        self.store.push_back(entry);
        accepted
    }

    /// Spawn the dispatcher. Must be called from within a tokio runtime.
    pub async fn start(&self) -> PushqResult<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(PushqError::AlreadyRunning);
        }

        let dispatcher = Dispatcher::new(
            self.config.dispatch.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.deliverer),
        )?
        .with_stats(Arc::clone(&self.stats));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(dispatcher.run(shutdown_rx));
        *running = Some(RunningDispatcher { shutdown_tx, join });

        tracing::info!(
            target_url = %self.config.dispatch.base_url(),
            pending = self.store.len(),
            "Push queue started"
        );
        Ok(())
    }

    /// Stop the dispatcher and wait for it to finish.
    ///
    /// A delivery in flight is allowed to complete within the shutdown
    /// timeout; past that the dispatcher task is aborted. Pending entries stay
    /// in the store.
    pub async fn stop(&self) -> PushqResult<()> {
        let Some(RunningDispatcher {
            shutdown_tx,
            mut join,
        }) = self.running.lock().await.take()
        else {
            return Err(PushqError::NotRunning);
        };

        // receiver may already be gone if the task ended
        let _ = shutdown_tx.send(true);

        let shutdown_timeout = self.config.dispatch.shutdown_timeout();
        match timeout(shutdown_timeout, &mut join).await {
            Ok(Ok(())) => {
                tracing::info!(pending = self.store.len(), "Push queue stopped");
            }
            Ok(Err(e)) => {
                tracing::error!("Dispatcher task ended abnormally: {}", e);
            }
            Err(_) => {
                join.abort();
                tracing::warn!(
                    "Dispatcher did not stop within {:?}, aborted",
                    shutdown_timeout
                );
            }
        }

        Ok(())
    }

    /// Check if the dispatcher is currently running.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Number of entries waiting for delivery.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if no entries are waiting for delivery.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get queue statistics.
    pub fn queue_stats(&self) -> QueueStats {
        self.store.stats()
    }

    /// Get dispatch statistics, accumulated across restarts.
    pub async fn dispatch_stats(&self) -> DispatchStats {
        self.stats.lock().await.clone()
    }

    /// Get the configuration used by this queue.
    pub fn config(&self) -> &PushqConfig {
        &self.config
    }
}

impl Drop for PushQueue {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.join.abort();
            tracing::warn!("Push queue dropped while running. Call stop() for a graceful shutdown.");
        }
    }
}
