//! Stable error codes for log fields and embedding hosts.

/// Every error enum implements this to expose a structured code string.
pub trait BeaconErrorCode {
    /// Returns the error code string (e.g., "STORAGE_UNAVAILABLE").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const TIMEOUT: &str = "TIMEOUT";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
