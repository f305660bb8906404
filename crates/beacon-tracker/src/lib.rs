//! # beacon-tracker
//!
//! Sends analytics events. [`send_event`] applies the localhost and opt-out
//! suppression rules, builds the payload, and dispatches it without
//! waiting. [`Tracker`] layers configured defaults and page context on top.

pub mod environment;
pub mod locality;
pub mod sender;
pub mod suppression;
pub mod tracing_setup;
pub mod tracker;

pub use environment::Environment;
pub use sender::{send_event, SendOutcome};
pub use suppression::Suppression;
pub use tracker::{EventData, Tracker, TrackerDefaults};

pub use beacon_core::models::{DestinationConfig, EventOptions, Props};
pub use beacon_transport::{Completion, Delivery};
