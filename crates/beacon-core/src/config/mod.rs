//! Configuration system for beacon.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod beacon_config;
pub mod storage_config;
pub mod tracker_config;
pub mod transport_config;

pub use beacon_config::{BeaconConfig, ConfigOverrides};
pub use storage_config::StorageConfig;
pub use tracker_config::TrackerConfig;
pub use transport_config::TransportConfig;
