//! Key/value store errors.

use super::error_code::{self, BeaconErrorCode};

/// Errors raised by a [`KeyValueStore`](crate::traits::KeyValueStore) or while
/// reaching one through a [`StorageScope`](crate::traits::StorageScope).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("storage access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("storage quota exceeded writing key {key}")]
    QuotaExceeded { key: String },

    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl BeaconErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::Unavailable { .. } | StorageError::AccessDenied { .. } => {
                error_code::STORAGE_UNAVAILABLE
            }
            StorageError::QuotaExceeded { .. } => error_code::QUOTA_EXCEEDED,
            StorageError::Backend { .. } => error_code::STORAGE_ERROR,
        }
    }
}
