//! Shared test doubles and golden fixtures for the beacon workspace.
//!
//! Provides a recording transport, misbehaving stores and scopes, a log
//! capture for asserting on diagnostics, and typed loaders for the JSON
//! files under `golden/`.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Notify;
use tracing_subscriber::fmt::MakeWriter;

use beacon_core::errors::{StorageError, TransportError};
use beacon_core::models::{DestinationConfig, EventRequest, TransportResponse};
use beacon_core::traits::{KeyValueStore, StorageScope, Transport};

// ── Fixture loading ──────────────────────────────────────────────────────

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Hostnames that must (and must not) be classified as local.
#[derive(Debug, Deserialize)]
pub struct HostnameFixture {
    pub local: Vec<String>,
    pub remote: Vec<String>,
}

pub fn hostnames() -> HostnameFixture {
    load_fixture("golden/hostnames.json")
}

/// A send with its exact expected request.
#[derive(Debug, Deserialize)]
pub struct RequestFixture {
    pub event_name: String,
    pub config: DestinationConfig,
    pub page_href: String,
    pub expected_url: String,
    pub expected_content_type: String,
    pub expected_body: String,
}

pub fn pageview_request() -> RequestFixture {
    load_fixture("golden/pageview_request.json")
}

// ── Transports ───────────────────────────────────────────────────────────

/// What a [`RecordingTransport`] answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    NetworkError(String),
    Timeout,
}

/// Records every request and answers with a fixed [`Reply`].
///
/// With a gate, `send` records the request and then parks until the gate is
/// notified, which lets a test observe the caller returning first.
pub struct RecordingTransport {
    requests: Mutex<Vec<EventRequest>>,
    reply: Reply,
    gate: Option<Arc<Notify>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::replying(Reply::Status(202))
    }

    pub fn replying(reply: Reply) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply,
            gate: None,
        }
    }

    /// A transport that holds every request until the returned gate fires.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let transport = Self {
            requests: Mutex::new(Vec::new()),
            reply: Reply::Status(202),
            gate: Some(Arc::clone(&gate)),
        };
        (transport, gate)
    }

    pub fn requests(&self) -> Vec<EventRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: EventRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        match self.reply {
            Reply::Status(status) => Ok(TransportResponse { status }),
            Reply::NetworkError(ref reason) => Err(TransportError::Network {
                reason: reason.clone(),
            }),
            Reply::Timeout => Err(TransportError::Timeout { after_secs: 10 }),
        }
    }
}

// ── Stores and scopes ────────────────────────────────────────────────────

/// Fails every operation, like storage disabled by browser policy.
#[derive(Debug, Default)]
pub struct ThrowingStore;

impl KeyValueStore for ThrowingStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(denied())
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(denied())
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(denied())
    }
}

fn denied() -> StorageError {
    StorageError::AccessDenied {
        reason: "storage disabled".to_string(),
    }
}

/// Panics on every operation.
#[derive(Debug, Default)]
pub struct PanickingStore;

impl KeyValueStore for PanickingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        panic!("get_item({key}) on a panicking store")
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        panic!("set_item({key}) on a panicking store")
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        panic!("remove_item({key}) on a panicking store")
    }
}

/// One operation in a [`JournalingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get(String),
    Set(String, String),
    Remove(String),
}

/// An in-memory store that journals every call and can refuse writes or
/// reads, or panic on reads, on demand.
#[derive(Debug, Default)]
pub struct JournalingStore {
    items: Mutex<std::collections::HashMap<String, String>>,
    ops: Mutex<Vec<StoreOp>>,
    reject_writes: bool,
    reject_reads: bool,
    panic_on_read: bool,
}

impl JournalingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Every `set_item` fails with a quota error.
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Every `get_item` fails.
    pub fn rejecting_reads(mut self) -> Self {
        self.reject_reads = true;
        self
    }

    /// Every `get_item` panics; writes and removals still succeed.
    pub fn panicking_reads(mut self) -> Self {
        self.panic_on_read = true;
        self
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.lock().unwrap().contains_key(key)
    }
}

impl KeyValueStore for JournalingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ops.lock().unwrap().push(StoreOp::Get(key.to_string()));
        if self.panic_on_read {
            panic!("get_item({key}) on a store with panicking reads");
        }
        if self.reject_reads {
            return Err(denied());
        }
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Set(key.to_string(), value.to_string()));
        if self.reject_writes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.ops.lock().unwrap().push(StoreOp::Remove(key.to_string()));
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A scope whose storage accessor always fails.
#[derive(Debug, Default)]
pub struct FailingScope {
    accesses: AtomicUsize,
}

impl FailingScope {
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }
}

impl StorageScope for FailingScope {
    fn local_storage(&self) -> Result<Option<Arc<dyn KeyValueStore>>, StorageError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::AccessDenied {
            reason: "sandboxed context".to_string(),
        })
    }
}

/// A scope whose storage accessor panics.
#[derive(Debug, Default)]
pub struct PanickingScope;

impl StorageScope for PanickingScope {
    fn local_storage(&self) -> Result<Option<Arc<dyn KeyValueStore>>, StorageError> {
        panic!("storage accessor blew up")
    }
}

// ── Log capture ──────────────────────────────────────────────────────────

/// Collects formatted tracing output in memory.
///
/// ```ignore
/// let logs = LogCapture::default();
/// tracing::subscriber::with_default(logs.subscriber(), || { /* ... */ });
/// assert!(logs.contents().contains("WARN"));
/// ```
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// A plain-text subscriber writing every level into this capture.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Lines logged at WARN level.
    pub fn warnings(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| l.contains(" WARN "))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
