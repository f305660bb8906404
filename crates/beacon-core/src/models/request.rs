use serde::{Deserialize, Serialize};

use super::EventPayload;
use crate::constants::{EVENT_CONTENT_TYPE, EVENT_ENDPOINT_PATH};

/// A fully built event submission, ready for a [`Transport`](crate::traits::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    /// Absolute URL: `{api_host}/api/event`.
    pub url: String,
    pub content_type: String,
    /// JSON-serialized [`EventPayload`].
    pub body: String,
}

impl EventRequest {
    pub fn for_payload(api_host: &str, payload: &EventPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            url: format!("{api_host}{EVENT_ENDPOINT_PATH}"),
            content_type: EVENT_CONTENT_TYPE.to_string(),
            body: payload.to_json()?,
        })
    }
}

/// What the transport observed. The body is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
}
