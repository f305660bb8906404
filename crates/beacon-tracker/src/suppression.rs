//! The two reasons an event is not sent.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use beacon_core::constants::{LOCALHOST_WARNING, OPT_OUT_KEY, OPT_OUT_VALUE, OPT_OUT_WARNING};
use beacon_core::models::DestinationConfig;
use beacon_core::traits::StorageScope;
use beacon_storage::{check_storage, StorageAvailability};

use crate::environment::Environment;
use crate::locality::is_local_page;

/// Why an event was suppressed. Suppression is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// The page runs locally and localhost tracking is off.
    Localhost,
    /// The user set the opt-out flag.
    OptedOut,
}

impl Suppression {
    /// The diagnostic logged when this suppression applies.
    pub fn message(&self) -> &'static str {
        match self {
            Suppression::Localhost => LOCALHOST_WARNING,
            Suppression::OptedOut => OPT_OUT_WARNING,
        }
    }
}

impl fmt::Display for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Apply the suppression rules in order: locality first, then opt-out.
pub fn check_suppression(config: &DestinationConfig, env: &Environment) -> Option<Suppression> {
    if !config.track_localhost && is_local_page(env.location()) {
        return Some(Suppression::Localhost);
    }
    if is_opted_out(env.storage()) {
        return Some(Suppression::OptedOut);
    }
    None
}

/// Whether the opt-out flag is set in `scope`'s store.
///
/// Unavailable storage, a missing key, a failed or panicking read, or any
/// value other than exactly `"true"` all mean not opted out.
pub fn is_opted_out(scope: &dyn StorageScope) -> bool {
    let store = match check_storage(Some(scope)) {
        StorageAvailability::Available(store) => store,
        StorageAvailability::Unavailable { .. } => return false,
    };
    match catch_unwind(AssertUnwindSafe(|| store.get_item(OPT_OUT_KEY))) {
        Ok(Ok(value)) => value.as_deref() == Some(OPT_OUT_VALUE),
        Ok(Err(e)) => {
            debug!(error = %e, "could not read opt-out flag");
            false
        }
        Err(_) => {
            debug!("opt-out flag read panicked");
            false
        }
    }
}
