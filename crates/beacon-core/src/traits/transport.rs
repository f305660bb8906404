use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::{EventRequest, TransportResponse};

/// Delivers one event request. Implementations must not retry.
///
/// Any HTTP status counts as a completed delivery; `Err` is reserved for
/// requests that never produced a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: EventRequest) -> Result<TransportResponse, TransportError>;
}
