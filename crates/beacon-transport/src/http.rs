//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use beacon_core::config::TransportConfig;
use beacon_core::errors::TransportError;
use beacon_core::models::{EventRequest, TransportResponse};
use beacon_core::traits::Transport;

/// Posts event requests with a shared `reqwest::Client`.
///
/// The response body is never read; any status is a completed delivery.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let timeout_secs = config.effective_timeout_secs();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|e| TransportError::InvalidRequest {
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Wrap an existing client, e.g. one shared with the host application.
    pub fn with_client(client: reqwest::Client, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                after_secs: self.timeout_secs,
            }
        } else if e.is_builder() {
            TransportError::InvalidRequest {
                reason: e.to_string(),
            }
        } else {
            TransportError::Network {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: EventRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, request.content_type.as_str())
            .body(request.body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        debug!(url = %request.url, status, "collector responded");
        Ok(TransportResponse { status })
    }
}
