//! # beacon-transport
//!
//! Delivers event requests. [`HttpTransport`] talks to the collector over
//! reqwest; [`dispatch`] runs one delivery in the background and hands back
//! a [`Completion`] that resolves once.

pub mod dispatch;
pub mod http;

pub use dispatch::{dispatch, Completion, Delivery};
pub use http::HttpTransport;
