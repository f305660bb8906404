//! Storage capability probe.
//!
//! Decides whether a scope exposes a store that is present and writable.
//! The probe writes the `plausible_test` sentinel and removes it again, so a
//! successful probe is briefly observable in the store.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use beacon_core::constants::{STORAGE_TEST_KEY, STORAGE_TEST_VALUE};
use beacon_core::traits::{KeyValueStore, StorageScope};

use crate::scope::AmbientScope;

/// Result of probing a scope for usable storage.
#[derive(Clone)]
pub enum StorageAvailability {
    /// The store accepted and released the sentinel key.
    Available(Arc<dyn KeyValueStore>),
    /// No usable store; `reason` is for diagnostics only.
    Unavailable { reason: String },
}

impl StorageAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, StorageAvailability::Available(_))
    }

    /// The probed store, when available.
    pub fn store(&self) -> Option<&Arc<dyn KeyValueStore>> {
        match self {
            StorageAvailability::Available(store) => Some(store),
            StorageAvailability::Unavailable { .. } => None,
        }
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        StorageAvailability::Unavailable {
            reason: reason.into(),
        }
    }
}

impl fmt::Debug for StorageAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageAvailability::Available(_) => f.write_str("Available"),
            StorageAvailability::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Probe `scope` (or the ambient scope when `None`).
///
/// Never panics: errors and panics raised by the scope or the store at any
/// step turn into [`StorageAvailability::Unavailable`].
pub fn check_storage(scope: Option<&dyn StorageScope>) -> StorageAvailability {
    let outcome = catch_unwind(AssertUnwindSafe(|| match scope {
        Some(scope) => probe(scope),
        None => probe(&AmbientScope),
    }));

    let availability = outcome
        .unwrap_or_else(|_| StorageAvailability::unavailable("storage probe panicked"));
    if let StorageAvailability::Unavailable { ref reason } = availability {
        debug!(reason = %reason, "storage unavailable");
    }
    availability
}

/// Boolean form of [`check_storage`].
pub fn is_storage_available(scope: Option<&dyn StorageScope>) -> bool {
    check_storage(scope).is_available()
}

fn probe(scope: &dyn StorageScope) -> StorageAvailability {
    let store = match scope.local_storage() {
        Ok(Some(store)) => store,
        Ok(None) => return StorageAvailability::unavailable("scope has no storage"),
        Err(e) => return StorageAvailability::unavailable(e.to_string()),
    };

    // Removal only follows an acknowledged write.
    let written = store.set_item(STORAGE_TEST_KEY, STORAGE_TEST_VALUE);
    if let Err(e) = written {
        return StorageAvailability::unavailable(e.to_string());
    }
    if let Err(e) = store.remove_item(STORAGE_TEST_KEY) {
        return StorageAvailability::unavailable(e.to_string());
    }

    StorageAvailability::Available(store)
}
