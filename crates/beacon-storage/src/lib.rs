//! # beacon-storage
//!
//! The storage probe that decides whether the opt-out flag can be honored,
//! and the key/value stores it probes.

pub mod memory_store;
pub mod probe;
pub mod scope;
pub mod sqlite_store;

use std::sync::Arc;

use beacon_core::config::StorageConfig;
use beacon_core::errors::StorageError;
use beacon_core::traits::KeyValueStore;

pub use memory_store::MemoryStore;
pub use probe::{check_storage, is_storage_available, StorageAvailability};
pub use scope::{clear_ambient_store, install_ambient_store, AmbientScope, EmptyScope, StoreScope};
pub use sqlite_store::SqliteStore;

/// Open the store described by `config`: SQLite when a path is set,
/// otherwise in memory.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.path {
        Some(ref path) => Ok(Arc::new(SqliteStore::open(path)?)),
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
