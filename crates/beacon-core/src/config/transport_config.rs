//! HTTP transport configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransportConfig {
    /// Request timeout in seconds. Default: 10.
    pub timeout_secs: Option<u64>,
    /// Custom `User-Agent` header.
    pub user_agent: Option<String>,
}

impl TransportConfig {
    /// Returns the effective timeout, defaulting to 10 seconds.
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Returns the user agent, defaulting to `beacon/<version>`.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("beacon/{}", crate::constants::VERSION))
    }
}
