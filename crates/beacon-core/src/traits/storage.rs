use std::sync::Arc;

use crate::errors::StorageError;

/// A synchronous, durable key/value store with string keys and values.
///
/// `set_item` acknowledges a completed write with `Ok(())`; anything else is
/// a failed write.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// The execution scope a store is reached through.
///
/// `Ok(None)` means the scope has no store at all; `Err` means reaching it
/// failed (disabled, sandboxed, denied).
pub trait StorageScope: Send + Sync {
    fn local_storage(&self) -> Result<Option<Arc<dyn KeyValueStore>>, StorageError>;
}
