//! Fire-and-forget delivery.
//!
//! [`dispatch`] spawns one delivery and returns immediately. When the
//! transport finishes (any status, or an error) the callback runs, then the
//! [`Completion`] resolves. Nothing is retried.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, error, Instrument};
use uuid::Uuid;

use beacon_core::models::{EventCallback, EventRequest};
use beacon_core::traits::Transport;

/// How a dispatched request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The collector answered; the status is not interpreted.
    Delivered { status: u16 },
    /// The request never produced a response.
    Failed { reason: String },
}

/// Handle to one in-flight delivery. Resolves at most once.
#[derive(Debug)]
pub struct Completion {
    dispatch_id: Uuid,
    rx: oneshot::Receiver<Delivery>,
}

impl Completion {
    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    /// Wait for the delivery to finish. By the time this returns `Some`, the
    /// caller's callback has already run. `None` means the delivery task was
    /// dropped before finishing (e.g. its runtime shut down).
    pub async fn wait(self) -> Option<Delivery> {
        self.rx.await.ok()
    }

    /// Non-blocking check; `None` while still in flight or if abandoned.
    pub fn try_result(&mut self) -> Option<Delivery> {
        self.rx.try_recv().ok()
    }
}

/// Spawn delivery of `request` and return without waiting.
///
/// Runs on `runtime` when given, else on the current tokio runtime, else on
/// a dedicated thread with its own current-thread runtime.
pub fn dispatch(
    transport: Arc<dyn Transport>,
    request: EventRequest,
    callback: Option<EventCallback>,
    runtime: Option<&Handle>,
) -> Completion {
    let dispatch_id = Uuid::new_v4();
    let (tx, rx) = oneshot::channel();

    let span = tracing::debug_span!("beacon.dispatch", dispatch_id = %dispatch_id, url = %request.url);
    let task = deliver(transport, request, callback, tx).instrument(span);

    match runtime.cloned().or_else(|| Handle::try_current().ok()) {
        Some(handle) => {
            handle.spawn(task);
        }
        None => spawn_detached(task),
    }

    Completion { dispatch_id, rx }
}

async fn deliver(
    transport: Arc<dyn Transport>,
    request: EventRequest,
    callback: Option<EventCallback>,
    tx: oneshot::Sender<Delivery>,
) {
    let delivery = match transport.send(request).await {
        Ok(response) => {
            debug!(status = response.status, "event delivered");
            Delivery::Delivered {
                status: response.status,
            }
        }
        Err(e) => {
            debug!(error = %e, "event delivery failed");
            Delivery::Failed {
                reason: e.to_string(),
            }
        }
    };

    if let Some(callback) = callback {
        // A panicking callback must not swallow the completion signal.
        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
            error!("event callback panicked");
        }
    }

    // The receiver may already be gone; the caller chose not to wait.
    let _ = tx.send(delivery);
}

fn spawn_detached<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let spawned = std::thread::Builder::new()
        .name("beacon-dispatch".to_string())
        .spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(task),
                Err(e) => error!(error = %e, "failed to build dispatch runtime"),
            }
        });
    if let Err(e) = spawned {
        error!(error = %e, "failed to spawn dispatch thread");
    }
}
