//! The dispatcher loop.
//!
//! One dispatcher delivers one task at a time. Each iteration pops the head
//! entry, attempts delivery, resolves the outcome and only then picks the
//! delay before the next iteration:
//!
//! - queue still non-empty: no delay ([`DispatchState::Draining`])
//! - queue empty: the idle poll interval ([`DispatchState::Idle`])
//!
//! Non-2xx responses are retried by pushing the entry back to the tail until
//! `max_retries + 1` attempts have been made. Transport errors are never
//! retried. No outcome escapes the loop; failures are reported through
//! `tracing` only.

use crate::config::DispatchConfig;
use crate::delivery::{Deliverer, DeliveryRequest, is_success};
use crate::error::PushqResult;
use crate::queue::SharedStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::time::sleep;

/// Scheduling state after an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Queue was empty; wait the idle interval
    Idle,
    /// Queue has a backlog; go again immediately
    Draining,
}

impl DispatchState {
    /// State for a queue holding `pending` entries.
    pub fn for_pending(pending: usize) -> Self {
        if pending > 0 {
            DispatchState::Draining
        } else {
            DispatchState::Idle
        }
    }

    /// Delay before the next iteration.
    pub fn delay(&self, config: &DispatchConfig) -> Duration {
        match self {
            DispatchState::Draining => Duration::ZERO,
            DispatchState::Idle => config.idle_poll_interval(),
        }
    }
}

/// What happened to an entry after one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 2xx response; the entry is dropped
    Delivered { status: u16 },
    /// Non-2xx response with attempts left; the entry goes back to the tail
    Retry { status: u16 },
    /// Non-2xx response on the last allowed attempt; the entry is dropped
    Exhausted { status: u16 },
    /// No response at all; the entry is dropped whatever the budget
    Abandoned { reason: String },
}

impl Resolution {
    /// Classify an outcome. `attempt` is the already incremented count.
    pub fn from_outcome(attempt: u32, max_retries: u32, outcome: &PushqResult<u16>) -> Self {
        match outcome {
            Ok(status) if is_success(*status) => Resolution::Delivered { status: *status },
            Ok(status) if attempt <= max_retries => Resolution::Retry { status: *status },
            Ok(status) => Resolution::Exhausted { status: *status },
            Err(error) => Resolution::Abandoned {
                reason: error.to_string(),
            },
        }
    }
}

/// Outcome counters since the dispatcher was created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Delivery attempts made
    pub attempts: u64,
    /// Entries delivered with a 2xx
    pub delivered: u64,
    /// Attempts that ended in a retry
    pub retried: u64,
    /// Entries dropped after their last attempt
    pub exhausted: u64,
    /// Entries dropped on a transport error
    pub abandoned: u64,
}

impl DispatchStats {
    fn record(&mut self, resolution: &Resolution) {
        self.attempts += 1;
        match resolution {
            Resolution::Delivered { .. } => self.delivered += 1,
            Resolution::Retry { .. } => self.retried += 1,
            Resolution::Exhausted { .. } => self.exhausted += 1,
            Resolution::Abandoned { .. } => self.abandoned += 1,
        }
    }
}

/// Single sequential delivery worker
pub struct Dispatcher {
    config: DispatchConfig,
    store: SharedStore,
    deliverer: Arc<dyn Deliverer>,
    stats: Arc<Mutex<DispatchStats>>,
}

impl Dispatcher {
    /// Create a dispatcher over a store and a transport.
    ///
    /// Fails with [`PushqError::Config`](crate::error::PushqError::Config) when `config` does not validate.
    pub fn new(
        config: DispatchConfig,
        store: SharedStore,
        deliverer: Arc<dyn Deliverer>,
    ) -> PushqResult<Self> {
        config.ensure_valid()?;
        Ok(Self {
            config,
            store,
            deliverer,
            stats: Arc::new(Mutex::new(DispatchStats::default())),
        })
    }

    /// Count into shared stats instead of fresh ones.
    pub fn with_stats(mut self, stats: Arc<Mutex<DispatchStats>>) -> Self {
        self.stats = stats;
        self
    }

    /// Get dispatch statistics
    pub async fn stats(&self) -> DispatchStats {
        self.stats.lock().await.clone()
    }

    /// Run one iteration and report the resulting scheduling state.
    pub async fn tick(&self) -> DispatchState {
        let Some(mut entry) = self.store.pop_front() else {
            return DispatchState::Idle;
        };

        let attempt = entry.record_attempt();
        let total = self.config.total_attempts();
        let request = DeliveryRequest::for_entry(&self.config, &entry);

        tracing::debug!(
            task_id = %entry.id,
            method = %request.method,
            url = %request.url,
            attempt,
            total,
            "Executing queued task"
        );

        let outcome = self.deliverer.deliver(&request).await;
        let resolution = Resolution::from_outcome(attempt, self.config.max_retries, &outcome);

        match &resolution {
            Resolution::Delivered { status } => {
                tracing::debug!(task_id = %entry.id, status, "Task delivered");
            }
            Resolution::Retry { status } => {
                tracing::warn!(
                    task_id = %entry.id,
                    status,
                    "Task returned non-2XX code {}. Current attempt {} of {}",
                    status,
                    attempt,
                    total
                );
                self.store.requeue(entry);
            }
            Resolution::Exhausted { status } => {
                tracing::error!(
                    task_id = %entry.id,
                    status,
                    "Task returned non-2XX code {}. Current attempt {} of {}",
                    status,
                    attempt,
                    total
                );
            }
            Resolution::Abandoned { reason } => {
                tracing::error!(
                    task_id = %entry.id,
                    url = %request.url,
                    "Unexpected error while executing task, not retrying: {}",
                    reason
                );
            }
        }

        self.stats.lock().await.record(&resolution);

        DispatchState::for_pending(self.store.len())
    }

    /// Loop until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The first check happens one idle interval after start. Shutdown is
    /// observed between iterations; an in-flight delivery is not interrupted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            target_url = %self.config.base_url(),
            max_retries = self.config.max_retries,
            "Task dispatcher started"
        );

        let mut delay = self.config.idle_poll_interval();
        while wait(delay, &mut shutdown).await {
            let state = self.tick().await;
            if state == DispatchState::Idle {
                tracing::trace!(
                    "Queue empty, next check in {:?}",
                    self.config.idle_poll_interval()
                );
            }
            delay = state.delay(&self.config);
        }

        tracing::info!("Task dispatcher stopped");
    }
}

/// Wait out `delay`. Returns `false` once shutdown is requested.
async fn wait(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return false;
    }

    if delay.is_zero() {
        tokio::task::yield_now().await;
        return !*shutdown.borrow();
    }

    tokio::select! {
        _ = sleep(delay) => !*shutdown.borrow(),
        changed = shutdown.changed() => changed.is_ok() && !*shutdown.borrow(),
    }
}
