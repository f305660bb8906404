//! Tracker defaults configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_API_HOST;

/// Defaults applied to every event the tracker sends.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// Collector base URL. Default: `https://plausible.io`.
    pub api_host: Option<String>,
    /// Site domain reported with each event. Default: the page hostname.
    pub domain: Option<String>,
    /// Whether the site routes through the URL fragment. Default: false.
    pub hash_mode: Option<bool>,
    /// Send events from localhost / `file:` pages too. Default: false.
    pub track_localhost: Option<bool>,
}

impl TrackerConfig {
    /// Returns the effective api host, defaulting to `https://plausible.io`.
    pub fn effective_api_host(&self) -> &str {
        self.api_host.as_deref().unwrap_or(DEFAULT_API_HOST)
    }

    /// Returns whether hash mode is on, defaulting to false.
    pub fn effective_hash_mode(&self) -> bool {
        self.hash_mode.unwrap_or(false)
    }

    /// Returns whether localhost tracking is on, defaulting to false.
    pub fn effective_track_localhost(&self) -> bool {
        self.track_localhost.unwrap_or(false)
    }
}
