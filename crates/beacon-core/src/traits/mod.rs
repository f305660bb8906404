pub mod storage;
pub mod transport;

pub use storage::{KeyValueStore, StorageScope};
pub use transport::Transport;
