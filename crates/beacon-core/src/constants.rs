/// Beacon client version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collector used when no `api_host` is configured.
pub const DEFAULT_API_HOST: &str = "https://plausible.io";

/// Path appended to the api host for event submission.
pub const EVENT_ENDPOINT_PATH: &str = "/api/event";

/// Content type of the event request. The collector parses the body as JSON
/// whatever this says.
pub const EVENT_CONTENT_TYPE: &str = "text/plain";

/// Sentinel key written and removed by the storage probe.
pub const STORAGE_TEST_KEY: &str = "plausible_test";
pub const STORAGE_TEST_VALUE: &str = "1";

/// Opt-out flag key and the only value that counts as opted out.
pub const OPT_OUT_KEY: &str = "plausible_ignore";
pub const OPT_OUT_VALUE: &str = "true";

/// Event names emitted by the tracker facade.
pub const PAGEVIEW_EVENT: &str = "pageview";
pub const OUTBOUND_LINK_EVENT: &str = "Outbound Link: Click";

/// Diagnostics emitted on the two suppression paths.
pub const LOCALHOST_WARNING: &str =
    "[Plausible] Ignoring event because website is running locally";
pub const OPT_OUT_WARNING: &str =
    "[Plausible] Ignoring event because \"plausible_ignore\" is set to \"true\" in localStorage";

/// Default request timeout for the HTTP transport.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default viewport width when the host page reports none.
pub const DEFAULT_DEVICE_WIDTH: u32 = 0;
