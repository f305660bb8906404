//! The event payload, exactly as it goes over the wire.

use serde::{Deserialize, Serialize};

use super::{DestinationConfig, Props};

/// Compact event record. Field names are the collector's wire keys.
///
/// `r` serializes as `null` when absent; `p` is omitted entirely when no
/// properties were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Event name.
    pub n: String,
    /// Page URL.
    pub u: String,
    /// Site domain.
    pub d: String,
    /// Referrer.
    pub r: Option<String>,
    /// Viewport width.
    pub w: u32,
    /// Hash mode, `1` or `0`.
    pub h: u8,
    /// JSON-encoded props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
}

impl EventPayload {
    /// Build the payload for `event_name`. Empty props are treated as absent.
    pub fn build(
        event_name: &str,
        config: &DestinationConfig,
        props: Option<&Props>,
    ) -> Result<Self, serde_json::Error> {
        let p = match props.filter(|p| !p.is_empty()) {
            Some(props) => Some(serde_json::to_string(props)?),
            None => None,
        };
        Ok(Self {
            n: event_name.to_string(),
            u: config.url.clone(),
            d: config.domain.clone(),
            r: config.referrer.clone(),
            w: config.device_width,
            h: u8::from(config.hash_mode),
            p,
        })
    }

    /// Serialize to the request body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode the `p` field back into a props map.
    pub fn props(&self) -> Result<Option<Props>, serde_json::Error> {
        self.p.as_deref().map(serde_json::from_str::<Props>).transpose()
    }
}
