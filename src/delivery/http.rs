//! HTTP deliverer backed by reqwest.

use super::{DeliveryRequest, Deliverer};
use crate::config::DispatchConfig;
use crate::error::{PushqError, PushqResult};
use async_trait::async_trait;
use reqwest::Client;

/// Plain HTTP transport.
///
/// The response body is never read. Without `request_timeout_ms` a request
/// waits for the target indefinitely.
#[derive(Debug, Clone)]
pub struct HttpDeliverer {
    client: Client,
}

impl HttpDeliverer {
    /// Build a client for the given dispatch settings.
    pub fn new(config: &DispatchConfig) -> PushqResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| PushqError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Use an existing client, e.g. one with default headers or a proxy.
    ///
    /// `request_timeout_ms` is not applied; configure it on the client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Deliverer for HttpDeliverer {
    async fn deliver(&self, request: &DeliveryRequest) -> PushqResult<u16> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        Ok(response.status().as_u16())
    }
}
