//! Transport errors. A transport error still completes the send: the
//! caller's callback fires all the same.

use super::error_code::{self, BeaconErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl BeaconErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            TransportError::Network { .. } => error_code::NETWORK_ERROR,
            TransportError::Timeout { .. } => error_code::TIMEOUT,
            TransportError::InvalidRequest { .. } => error_code::INVALID_REQUEST,
        }
    }
}
