//! Tracker facade: configured defaults plus page context, merged per event.

use reqwest::Url;
use tracing::debug;

use beacon_core::config::{BeaconConfig, TrackerConfig};
use beacon_core::constants::{DEFAULT_API_HOST, OUTBOUND_LINK_EVENT, PAGEVIEW_EVENT};
use beacon_core::models::{DestinationConfig, EventOptions};

use crate::environment::Environment;
use crate::sender::{send_event, SendOutcome};

/// Settings applied to every event unless a call overrides them.
///
/// Unset fields fall back to what the [`Environment`] knows about the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerDefaults {
    pub api_host: String,
    /// Defaults to the page hostname.
    pub domain: Option<String>,
    pub hash_mode: bool,
    pub track_localhost: bool,
    /// Defaults to the page URL.
    pub url: Option<String>,
    /// Defaults to the environment's referrer.
    pub referrer: Option<String>,
    /// Defaults to the environment's device width.
    pub device_width: Option<u32>,
}

impl Default for TrackerDefaults {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            domain: None,
            hash_mode: false,
            track_localhost: false,
            url: None,
            referrer: None,
            device_width: None,
        }
    }
}

impl From<&TrackerConfig> for TrackerDefaults {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            api_host: config.effective_api_host().to_string(),
            domain: config.domain.clone(),
            hash_mode: config.effective_hash_mode(),
            track_localhost: config.effective_track_localhost(),
            ..Default::default()
        }
    }
}

/// Per-call overrides; they win over [`TrackerDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
    pub url: Option<String>,
    pub referrer: Option<String>,
    pub device_width: Option<u32>,
}

/// Sends events for one site.
#[derive(Debug, Clone)]
pub struct Tracker {
    defaults: TrackerDefaults,
    env: Environment,
}

impl Tracker {
    pub fn new(defaults: TrackerDefaults, env: Environment) -> Self {
        Self { defaults, env }
    }

    pub fn from_config(config: &BeaconConfig, env: Environment) -> Self {
        Self::new(TrackerDefaults::from(&config.tracker), env)
    }

    pub fn defaults(&self) -> &TrackerDefaults {
        &self.defaults
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Point the tracker at a new page, keeping everything else.
    pub fn navigate(&mut self, env: Environment) {
        self.env = env;
    }

    /// Resolve the destination for one event: call data, then defaults,
    /// then page context. An empty referrer counts as none at every level.
    pub fn destination(&self, data: Option<&EventData>) -> DestinationConfig {
        let location = self.env.location();
        let data = data.cloned().unwrap_or_default();
        DestinationConfig {
            api_host: self.defaults.api_host.clone(),
            domain: self
                .defaults
                .domain
                .clone()
                .unwrap_or_else(|| location.hostname.clone()),
            url: data
                .url
                .or_else(|| self.defaults.url.clone())
                .unwrap_or_else(|| location.href.clone()),
            referrer: data
                .referrer
                .or_else(|| self.defaults.referrer.clone())
                .or_else(|| self.env.referrer().map(str::to_string))
                .filter(|r| !r.is_empty()),
            device_width: data
                .device_width
                .or(self.defaults.device_width)
                .unwrap_or_else(|| self.env.device_width()),
            hash_mode: self.defaults.hash_mode,
            track_localhost: self.defaults.track_localhost,
        }
    }

    /// Send a custom event.
    pub fn track_event(
        &self,
        event_name: &str,
        options: Option<EventOptions>,
        data: Option<EventData>,
    ) -> SendOutcome {
        let config = self.destination(data.as_ref());
        send_event(event_name, &config, options, &self.env)
    }

    /// Send a pageview.
    pub fn track_pageview(
        &self,
        data: Option<EventData>,
        options: Option<EventOptions>,
    ) -> SendOutcome {
        self.track_event(PAGEVIEW_EVENT, options, data)
    }

    /// Record a click on a link leaving the site.
    ///
    /// Returns `None` without sending when `href` is not a URL or points at
    /// the current page's host. The link is reported in the `url` prop.
    pub fn track_outbound_link(
        &self,
        href: &str,
        options: Option<EventOptions>,
    ) -> Option<SendOutcome> {
        let link = Url::parse(href).ok()?;
        let link_host = authority(&link)?;
        let page_host = Url::parse(&self.env.location().href)
            .ok()
            .and_then(|page| authority(&page));
        if page_host.as_deref() == Some(link_host.as_str()) {
            debug!(href, "same-host link, not outbound");
            return None;
        }

        let options = options.unwrap_or_default().with_prop("url", href);
        Some(self.track_event(OUTBOUND_LINK_EVENT, Some(options), None))
    }
}

/// `host[:port]`, the part of a URL that decides whether a link leaves the site.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
