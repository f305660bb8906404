//! Tracing initialization for hosts that embed the tracker.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging to stderr.
///
/// Reads `BEACON_LOG` for per-target levels, e.g.
/// `BEACON_LOG=beacon_tracker=debug,beacon_transport=warn`. Falls back to
/// `beacon=info`, which keeps both suppression warnings visible.
///
/// Idempotent. If the host already installed a global subscriber, that one
/// is kept.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("BEACON_LOG").unwrap_or_else(|_| EnvFilter::new("beacon=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

/// Initialize JSON logging to stderr with an explicit filter string.
pub fn init_tracing_json(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .json()
        .try_init();
}
