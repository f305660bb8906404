use serde::{Deserialize, Serialize};

/// Where and how a single event is sent. Immutable for the duration of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Collector base URL, without trailing slash.
    pub api_host: String,
    /// Site domain the event is attributed to.
    pub domain: String,
    /// Full URL of the current page.
    pub url: String,
    pub referrer: Option<String>,
    /// Viewport width in CSS pixels.
    pub device_width: u32,
    /// Whether the site uses fragment-based routing.
    pub hash_mode: bool,
    /// Disables the localhost suppression rule when true.
    pub track_localhost: bool,
}
