//! The event send routine.

use tracing::{debug, error, warn};

use beacon_core::models::{DestinationConfig, EventOptions, EventPayload, EventRequest};
use beacon_transport::{dispatch, Completion, Delivery};

use crate::environment::Environment;
use crate::suppression::{check_suppression, Suppression};

/// What `send_event` did. Never an error: every failure mode ends in one of
/// these.
#[derive(Debug)]
pub enum SendOutcome {
    /// Not sent; a warning was logged. The callback will not run.
    Suppressed(Suppression),
    /// Handed to the transport. The callback runs when it finishes.
    Dispatched(Completion),
    /// The payload could not be encoded; nothing was sent.
    Dropped { reason: String },
}

impl SendOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SendOutcome::Dispatched(_))
    }

    pub fn suppression(&self) -> Option<Suppression> {
        match self {
            SendOutcome::Suppressed(s) => Some(*s),
            _ => None,
        }
    }

    pub fn into_completion(self) -> Option<Completion> {
        match self {
            SendOutcome::Dispatched(completion) => Some(completion),
            _ => None,
        }
    }

    /// Wait for the delivery if one was dispatched.
    pub async fn wait(self) -> Option<Delivery> {
        match self.into_completion() {
            Some(completion) => completion.wait().await,
            None => None,
        }
    }
}

/// Send `event_name` to `config.api_host`, unless suppressed.
///
/// Returns immediately; the request runs in the background. When the
/// transport finishes, successfully or not, `options.callback` runs once.
/// A suppressed send logs one warning and never runs the callback.
pub fn send_event(
    event_name: &str,
    config: &DestinationConfig,
    options: Option<EventOptions>,
    env: &Environment,
) -> SendOutcome {
    if let Some(suppression) = check_suppression(config, env) {
        warn!("{}", suppression.message());
        return SendOutcome::Suppressed(suppression);
    }

    let (props, callback) = match options {
        Some(options) => (options.sendable_props().cloned(), options.callback),
        None => (None, None),
    };

    let request = EventPayload::build(event_name, config, props.as_ref())
        .and_then(|payload| EventRequest::for_payload(&config.api_host, &payload));
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            error!(event = event_name, error = %e, "failed to encode event payload");
            return SendOutcome::Dropped {
                reason: e.to_string(),
            };
        }
    };

    debug!(event = event_name, domain = %config.domain, url = %request.url, "sending event");
    SendOutcome::Dispatched(dispatch(env.transport(), request, callback, env.runtime()))
}
