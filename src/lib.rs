//! # pushq
//!
//! A local, in-memory stand-in for a hosted push task queue.
//!
//! Callers enqueue "deliver this HTTP request later" tasks. A single
//! background dispatcher fires them one at a time against a fixed host,
//! retrying non-2xx responses up to a configured bound.
//!
//! - **Enqueue never fails**: acceptance is a plain return value
//! - **Sequential delivery**: one request in flight, a slow target stalls dispatch
//! - **FIFO with tail retries**: a failed task goes to the back of the line
//! - **Adaptive polling**: drain a backlog immediately, poll an empty queue slowly
//! - **Transport errors are final**: only responses are retried
//!
//! Nothing is persisted, queue names and ETAs are carried but ignored, and
//! the outcome of a delivery is only visible through `tracing` output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pushq::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> PushqResult<()> {
//!     let config = PushqConfig {
//!         dispatch: DispatchConfig::configure("api.local", 9090, 1),
//!         ..PushqConfig::development()
//!     };
//!     pushq::logging::init(&config.logging)?;
//!
//!     let queue = PushQueue::new(config)?;
//!     queue.start().await?;
//!
//!     let options = TaskOptions::new("/t1").with_method(TaskMethod::Put).with_body("x");
//!     let accepted = queue.enqueue(None, options);
//!     tracing::info!("accepted task {}", accepted.task_id);
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     queue.stop().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod queue;
pub mod task;

pub mod prelude {
    pub use crate::config::*;
    pub use crate::core::{DispatchState, DispatchStats, Dispatcher, PushQueue, Resolution};
    pub use crate::delivery::{Deliverer, DeliveryRequest, HttpDeliverer};
    pub use crate::error::{PushqError, PushqResult};
    pub use crate::queue::{InMemoryStore, QueueStats, TaskStore};
    pub use crate::task::{Accepted, OriginContext, TaskEntry, TaskId, TaskMethod, TaskOptions};
    pub use async_trait::async_trait;
}

pub use crate::config::*;
pub use crate::core::{DispatchState, DispatchStats, Dispatcher, PushQueue, Resolution};
pub use crate::delivery::{Deliverer, DeliveryRequest, HttpDeliverer};
pub use crate::error::{PushqError, PushqResult};
pub use crate::queue::{InMemoryStore, QueueStats, TaskStore};
pub use crate::task::{Accepted, OriginContext, TaskEntry, TaskId, TaskMethod, TaskOptions};
pub use async_trait::async_trait;
