//! Scopes a store can be reached through, including the process-wide
//! ambient scope the probe falls back to.

use std::sync::{Arc, RwLock};

use beacon_core::errors::StorageError;
use beacon_core::traits::{KeyValueStore, StorageScope};

static AMBIENT_STORE: RwLock<Option<Arc<dyn KeyValueStore>>> = RwLock::new(None);

/// Install the store the ambient scope exposes. Replaces any previous one.
pub fn install_ambient_store(store: Arc<dyn KeyValueStore>) {
    match AMBIENT_STORE.write() {
        Ok(mut slot) => *slot = Some(store),
        Err(poisoned) => *poisoned.into_inner() = Some(store),
    }
}

/// Remove the ambient store; the ambient scope then has no storage.
pub fn clear_ambient_store() {
    match AMBIENT_STORE.write() {
        Ok(mut slot) => *slot = None,
        Err(poisoned) => *poisoned.into_inner() = None,
    }
}

/// The process-wide scope. Empty until [`install_ambient_store`] is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientScope;

impl StorageScope for AmbientScope {
    fn local_storage(&self) -> Result<Option<Arc<dyn KeyValueStore>>, StorageError> {
        let slot = AMBIENT_STORE.read().map_err(|_| StorageError::Unavailable {
            reason: "ambient store lock poisoned".to_string(),
        })?;
        Ok(slot.clone())
    }
}

/// A scope that always exposes the same store.
#[derive(Clone)]
pub struct StoreScope {
    store: Arc<dyn KeyValueStore>,
}

impl StoreScope {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl StorageScope for StoreScope {
    fn local_storage(&self) -> Result<Option<Arc<dyn KeyValueStore>>, StorageError> {
        Ok(Some(Arc::clone(&self.store)))
    }
}

/// A scope with no storage at all (headless hosts, sandboxed contexts).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScope;

impl StorageScope for EmptyScope {
    fn local_storage(&self) -> Result<Option<Arc<dyn KeyValueStore>>, StorageError> {
        Ok(None)
    }
}
