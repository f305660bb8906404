//! Durable store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file backing the durable store. When unset the store lives in
    /// memory and the opt-out flag does not survive a restart.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Whether a durable (file-backed) store is configured.
    pub fn is_durable(&self) -> bool {
        self.path.is_some()
    }
}
