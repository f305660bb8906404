//! Event, destination, and wire types.

pub mod destination;
pub mod location;
pub mod options;
pub mod payload;
pub mod request;

pub use destination::DestinationConfig;
pub use location::PageLocation;
pub use options::{EventCallback, EventOptions, Props};
pub use payload::EventPayload;
pub use request::{EventRequest, TransportResponse};
