//! Error handling for beacon.
//! One error enum per subsystem, `thiserror` only. None of these ever
//! escape `send_event` or the storage probe; they are logged and folded
//! into outcomes there.

pub mod config_error;
pub mod error_code;
pub mod storage_error;
pub mod transport_error;

pub use config_error::ConfigError;
pub use error_code::BeaconErrorCode;
pub use storage_error::StorageError;
pub use transport_error::TransportError;

/// Top-level error aggregating every subsystem.
#[derive(Debug, thiserror::Error)]
pub enum BeaconError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BeaconResult<T> = Result<T, BeaconError>;

impl BeaconErrorCode for BeaconError {
    fn error_code(&self) -> &'static str {
        match self {
            BeaconError::Storage(e) => e.error_code(),
            BeaconError::Transport(e) => e.error_code(),
            BeaconError::Config(e) => e.error_code(),
            BeaconError::Serialization(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}
