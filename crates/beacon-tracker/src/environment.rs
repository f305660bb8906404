//! Everything a send reads from its surroundings, passed in explicitly.

use std::sync::Arc;

use reqwest::Url;
use tokio::runtime::Handle;

use beacon_core::config::BeaconConfig;
use beacon_core::errors::{BeaconResult, ConfigError};
use beacon_core::models::PageLocation;
use beacon_core::traits::{StorageScope, Transport};
use beacon_storage::{open_store, StoreScope};
use beacon_transport::HttpTransport;

/// The page, the storage scope, the transport, and optionally the runtime
/// that deliveries are spawned on.
#[derive(Clone)]
pub struct Environment {
    location: PageLocation,
    referrer: Option<String>,
    device_width: u32,
    storage: Arc<dyn StorageScope>,
    transport: Arc<dyn Transport>,
    runtime: Option<Handle>,
}

impl Environment {
    pub fn new(
        location: PageLocation,
        storage: Arc<dyn StorageScope>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            location,
            referrer: None,
            device_width: beacon_core::constants::DEFAULT_DEVICE_WIDTH,
            storage,
            transport,
            runtime: None,
        }
    }

    /// Production wiring: HTTP transport and the configured store, for the
    /// page at `page_url`.
    pub fn from_config(config: &BeaconConfig, page_url: &str) -> BeaconResult<Self> {
        let location = parse_location(page_url)?;
        let store = open_store(&config.storage)?;
        let transport = HttpTransport::new(&config.transport)?;
        Ok(Self::new(
            location,
            Arc::new(StoreScope::new(store)),
            Arc::new(transport),
        ))
    }

    /// Referring page. Empty strings count as no referrer.
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        let referrer = referrer.into();
        self.referrer = (!referrer.is_empty()).then_some(referrer);
        self
    }

    pub fn with_device_width(mut self, width: u32) -> Self {
        self.device_width = width;
        self
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Same surroundings, different page (client-side navigation).
    pub fn navigate(&self, location: PageLocation) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    pub fn device_width(&self) -> u32 {
        self.device_width
    }

    pub fn storage(&self) -> &dyn StorageScope {
        self.storage.as_ref()
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn runtime(&self) -> Option<&Handle> {
        self.runtime.as_ref()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("location", &self.location)
            .field("referrer", &self.referrer)
            .field("device_width", &self.device_width)
            .field("runtime", &self.runtime.is_some())
            .finish_non_exhaustive()
    }
}

/// Parse a page URL into the location the suppression rules look at.
pub fn parse_location(page_url: &str) -> Result<PageLocation, ConfigError> {
    let url = Url::parse(page_url).map_err(|e| ConfigError::ValidationFailed {
        field: "page_url".to_string(),
        message: format!("{page_url}: {e}"),
    })?;
    Ok(PageLocation::new(
        url.as_str(),
        url.host_str().unwrap_or_default(),
        url.scheme(),
    ))
}
