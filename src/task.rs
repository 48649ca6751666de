//! Task options and queue entries.

use crate::error::PushqError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::SystemTime;

/// Unique identifier for a task
pub type TaskId = String;

/// Opaque handle to whatever inbound request caused a task to be enqueued.
///
/// It is stored with the entry and never inspected.
pub type OriginContext = Arc<dyn Any + Send + Sync>;

/// Queue name used when the caller gives none
pub const DEFAULT_QUEUE_NAME: &str = "default";

/// HTTP method used to deliver a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskMethod {
    /// GET
    Get,
    /// POST (default)
    #[default]
    Post,
    /// HEAD
    Head,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl TaskMethod {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMethod::Get => "GET",
            TaskMethod::Post => "POST",
            TaskMethod::Head => "HEAD",
            TaskMethod::Put => "PUT",
            TaskMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for TaskMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskMethod {
    type Err = PushqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(TaskMethod::Get),
            "post" => Ok(TaskMethod::Post),
            "head" => Ok(TaskMethod::Head),
            "put" => Ok(TaskMethod::Put),
            "delete" => Ok(TaskMethod::Delete),
            _ => Err(PushqError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TaskMethod {
    type Error = PushqError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskMethod> for String {
    fn from(method: TaskMethod) -> Self {
        method.as_str().to_ascii_lowercase()
    }
}

impl From<TaskMethod> for reqwest::Method {
    fn from(method: TaskMethod) -> Self {
        match method {
            TaskMethod::Get => reqwest::Method::GET,
            TaskMethod::Post => reqwest::Method::POST,
            TaskMethod::Head => reqwest::Method::HEAD,
            TaskMethod::Put => reqwest::Method::PUT,
            TaskMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

fn default_queue_name() -> String {
    DEFAULT_QUEUE_NAME.to_string()
}

/// What to deliver, as handed to `enqueue`.
///
/// Field names follow the push-queue contract (`url`, `queueName`, `taskName`,
/// `etaUsec`, `method`, `body`, `headers`) so options can be read straight from
/// JSON. `queue_name`, `task_name` and `eta_usec` are carried but never used by
/// dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOptions {
    /// Path appended to the configured target, e.g. `/tasks/send-mail`
    pub url: String,

    #[serde(default = "default_queue_name")]
    pub queue_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,

    /// ETA in microseconds, as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_usec: Option<String>,

    #[serde(default)]
    pub method: TaskMethod,

    /// Request body, meaningful for POST and PUT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl TaskOptions {
    /// POST to `url` on the default queue.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            queue_name: default_queue_name(),
            ..Default::default()
        }
    }

    /// Set the HTTP method. Defaults to POST.
    pub fn with_method(mut self, method: TaskMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the request body, sent as-is.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header. A repeated name replaces the earlier value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the queue name reported back in [`Accepted`]. Has no effect on delivery.
    pub fn with_queue_name(mut self, queue_name: impl Into<String>) -> Self {
        self.queue_name = queue_name.into();
        self
    }

    /// Set a task name. Carried with the entry, never interpreted.
    pub fn with_task_name(mut self, task_name: impl Into<String>) -> Self {
        self.task_name = Some(task_name.into());
        self
    }

    /// Set the requested execution time. Accepted but ignored: tasks are delivered in order.
    pub fn with_eta_usec(mut self, eta_usec: impl Into<String>) -> Self {
        self.eta_usec = Some(eta_usec.into());
        self
    }
}

/// One pending or in-flight delivery plus its retry bookkeeping.
#[derive(Clone)]
pub struct TaskEntry {
    /// Unique task identifier
    pub id: TaskId,
    /// Inbound request that caused the enqueue, if any
    pub origin: Option<OriginContext>,
    /// Delivery descriptor
    pub options: TaskOptions,
    /// Delivery attempts made so far
    pub attempt_count: u32,
    /// When the task was accepted
    pub enqueued_at: SystemTime,
}

impl TaskEntry {
    /// Create a fresh entry with no attempts.
    pub fn new(origin: Option<OriginContext>, options: TaskOptions) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            origin,
            options,
            attempt_count: 0,
            enqueued_at: SystemTime::now(),
        }
    }

    /// Count one more delivery attempt and return the new total.
    pub fn record_attempt(&mut self) -> u32 {
        self.attempt_count += 1;
        self.attempt_count
    }
}

impl fmt::Debug for TaskEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEntry")
            .field("id", &self.id)
            .field("has_origin", &self.origin.is_some())
            .field("options", &self.options)
            .field("attempt_count", &self.attempt_count)
            .field("enqueued_at", &self.enqueued_at)
            .finish()
    }
}

/// Returned synchronously by `enqueue`: the task is in the store.
///
/// Acceptance says nothing about delivery, which happens later and reports
/// only through diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub task_id: TaskId,
    pub queue_name: String,
}
