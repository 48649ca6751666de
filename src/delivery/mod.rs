//! Outbound delivery of queued tasks.
//!
//! The dispatcher only needs one capability from the transport: send a request
//! and report either the status code of the response or that no response was
//! obtained. [`Deliverer`] is that seam; [`HttpDeliverer`] is the real
//! implementation, tests plug in scripted ones.

use crate::config::DispatchConfig;
use crate::error::PushqResult;
use crate::task::{TaskEntry, TaskMethod};
use async_trait::async_trait;
use std::collections::HashMap;

pub mod http;
pub use http::HttpDeliverer;

#[cfg(test)]
pub(crate) mod scripted;

/// A fully resolved outbound request for one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub method: TaskMethod,
    /// `http://{target_host}:{target_port}/{task path}`
    pub url: String,
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
}

impl DeliveryRequest {
    /// Resolve an entry against the configured target.
    ///
    /// Host and port always come from the config; the entry only supplies the
    /// path, method, body and headers. A path without a leading `/` gets one.
    pub fn for_entry(config: &DispatchConfig, entry: &TaskEntry) -> Self {
        let path = entry.options.url.as_str();
        let separator = if path.starts_with('/') { "" } else { "/" };

        Self {
            method: entry.options.method,
            url: format!("{}{}{}", config.base_url(), separator, path),
            body: entry.options.body.clone(),
            headers: entry.options.headers.clone(),
        }
    }
}

/// Transport used by the dispatcher.
#[async_trait]
pub trait Deliverer: Send + Sync {
    /// Issue the request and wait for exactly one outcome.
    ///
    /// `Ok(status)` means a response arrived, whatever its status.
    /// `Err(PushqError::Transport { .. })` means none did.
    async fn deliver(&self, request: &DeliveryRequest) -> PushqResult<u16>;
}

/// Whether a status code counts as a successful delivery.
pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}
