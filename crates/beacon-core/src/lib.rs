//! # beacon-core
//!
//! Foundation crate for the beacon analytics client.
//! Defines the event and destination types, storage/transport traits,
//! errors, config, and constants. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::BeaconConfig;
pub use errors::{BeaconError, BeaconResult};
pub use models::{
    DestinationConfig, EventOptions, EventPayload, EventRequest, PageLocation, Props,
    TransportResponse,
};
pub use traits::{KeyValueStore, StorageScope, Transport};
