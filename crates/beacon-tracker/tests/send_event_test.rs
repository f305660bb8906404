//! send_event: suppression rules, payload, transmission, completion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use beacon_core::models::{DestinationConfig, EventOptions, PageLocation};
use beacon_core::traits::StorageScope;
use beacon_storage::{EmptyScope, MemoryStore, StoreScope};
use beacon_tracker::{send_event, Delivery, Environment, SendOutcome, Suppression};
use test_fixtures::{
    FailingScope, JournalingStore, LogCapture, PanickingScope, RecordingTransport, Reply, StoreOp,
    ThrowingStore,
};

const LOCALHOST_WARNING: &str = "[Plausible] Ignoring event because website is running locally";
const OPT_OUT_WARNING: &str =
    "[Plausible] Ignoring event because \"plausible_ignore\" is set to \"true\" in localStorage";

// ── Harness ──────────────────────────────────────────────────────────────

fn page(hostname: &str) -> PageLocation {
    PageLocation::new(format!("http://{hostname}/"), hostname, "http")
}

fn env(
    location: PageLocation,
    storage: Arc<dyn StorageScope>,
    transport: Arc<RecordingTransport>,
) -> Environment {
    Environment::new(location, storage, transport)
}

fn remote_env(transport: Arc<RecordingTransport>) -> Environment {
    env(page("site.com"), Arc::new(EmptyScope), transport)
}

fn config(track_localhost: bool) -> DestinationConfig {
    DestinationConfig {
        api_host: "https://example.com".to_string(),
        domain: "site.com".to_string(),
        url: "https://site.com/x".to_string(),
        referrer: None,
        device_width: 1024,
        hash_mode: false,
        track_localhost,
    }
}

fn opted_out_scope(value: &str) -> Arc<dyn StorageScope> {
    Arc::new(StoreScope::new(Arc::new(MemoryStore::with_items([(
        "plausible_ignore",
        value,
    )]))))
}

fn counting_options(count: &Arc<AtomicUsize>) -> EventOptions {
    let count = Arc::clone(count);
    EventOptions::new().with_callback(move || {
        count.fetch_add(1, Ordering::SeqCst);
    })
}

fn send_capturing(
    config: &DestinationConfig,
    options: Option<EventOptions>,
    env: &Environment,
) -> (SendOutcome, LogCapture) {
    let logs = LogCapture::default();
    let outcome = tracing::subscriber::with_default(logs.subscriber(), || {
        send_event("pageview", config, options, env)
    });
    (outcome, logs)
}

// ── Localhost suppression ────────────────────────────────────────────────

#[test]
fn local_hostnames_are_suppressed_with_warning() {
    for hostname in ["localhost", "127.0.0.1", "127.0.0.0.1", "::1"] {
        let transport = Arc::new(RecordingTransport::new());
        let env = env(page(hostname), Arc::new(EmptyScope), transport.clone());
        let count = Arc::new(AtomicUsize::new(0));

        let (outcome, logs) = send_capturing(&config(false), Some(counting_options(&count)), &env);

        assert_eq!(outcome.suppression(), Some(Suppression::Localhost), "{hostname}");
        assert_eq!(transport.request_count(), 0, "{hostname}");
        assert_eq!(count.load(Ordering::SeqCst), 0, "{hostname}");
        let warnings = logs.warnings();
        assert_eq!(warnings.len(), 1, "{hostname}: {warnings:?}");
        assert!(warnings[0].contains(LOCALHOST_WARNING), "{hostname}");
    }
}

#[test]
fn fixture_local_hostnames_are_all_suppressed() {
    for hostname in test_fixtures::hostnames().local {
        let transport = Arc::new(RecordingTransport::new());
        let env = env(page(&hostname), Arc::new(EmptyScope), transport.clone());
        let outcome = send_event("pageview", &config(false), None, &env);
        assert_eq!(outcome.suppression(), Some(Suppression::Localhost), "{hostname}");
        assert_eq!(transport.request_count(), 0);
    }
}

#[test]
fn file_pages_are_suppressed() {
    let transport = Arc::new(RecordingTransport::new());
    let location = PageLocation::new("file:///home/me/site/index.html", "", "file:");
    let env = env(location, Arc::new(EmptyScope), transport.clone());

    let outcome = send_event("pageview", &config(false), None, &env);
    assert_eq!(outcome.suppression(), Some(Suppression::Localhost));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn local_hostnames_send_when_tracking_localhost() {
    for hostname in ["localhost", "127.0.0.1", "127.0.0.0.1", "::1"] {
        let transport = Arc::new(RecordingTransport::new());
        let env = env(page(hostname), Arc::new(EmptyScope), transport.clone());

        let outcome = send_event("pageview", &config(true), None, &env);
        assert!(outcome.is_dispatched(), "{hostname}");
        assert!(outcome.wait().await.is_some());
        assert_eq!(transport.request_count(), 1, "{hostname}");
    }
}

#[test]
fn localhost_check_runs_before_storage_is_touched() {
    let store = Arc::new(JournalingStore::new().with_item("plausible_ignore", "true"));
    let transport = Arc::new(RecordingTransport::new());
    let env = env(
        page("localhost"),
        Arc::new(StoreScope::new(store.clone())),
        transport,
    );

    let (outcome, logs) = send_capturing(&config(false), None, &env);
    assert_eq!(outcome.suppression(), Some(Suppression::Localhost));
    assert!(store.ops().is_empty());
    assert!(!logs.contents().contains(OPT_OUT_WARNING));
}

// ── Opt-out suppression ──────────────────────────────────────────────────

#[test]
fn opt_out_flag_suppresses_with_warning() {
    let transport = Arc::new(RecordingTransport::new());
    let env = env(page("site.com"), opted_out_scope("true"), transport.clone());
    let count = Arc::new(AtomicUsize::new(0));

    let (outcome, logs) = send_capturing(&config(false), Some(counting_options(&count)), &env);

    assert_eq!(outcome.suppression(), Some(Suppression::OptedOut));
    assert_eq!(transport.request_count(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains(OPT_OUT_WARNING));
}

#[test]
fn opt_out_applies_even_when_tracking_localhost() {
    let transport = Arc::new(RecordingTransport::new());
    let env = env(page("localhost"), opted_out_scope("true"), transport.clone());

    let outcome = send_event("pageview", &config(true), None, &env);
    assert_eq!(outcome.suppression(), Some(Suppression::OptedOut));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn other_opt_out_values_do_not_suppress() {
    for value in ["false", "1", "TRUE", " true", "true ", "yes", ""] {
        let transport = Arc::new(RecordingTransport::new());
        let env = env(page("site.com"), opted_out_scope(value), transport.clone());

        let outcome = send_event("pageview", &config(false), None, &env);
        assert!(outcome.is_dispatched(), "value {value:?} should not suppress");
        outcome.wait().await;
        assert_eq!(transport.request_count(), 1);
    }
}

#[tokio::test]
async fn absent_opt_out_key_does_not_suppress() {
    let transport = Arc::new(RecordingTransport::new());
    let store = Arc::new(JournalingStore::new());
    let env = env(
        page("site.com"),
        Arc::new(StoreScope::new(store.clone())),
        transport.clone(),
    );

    let outcome = send_event("pageview", &config(false), None, &env);
    assert!(outcome.wait().await.is_some());
    assert_eq!(transport.request_count(), 1);
    // Probe sentinel first, then the single read of the flag; never a write to it.
    assert_eq!(
        store.ops(),
        vec![
            StoreOp::Set("plausible_test".into(), "1".into()),
            StoreOp::Remove("plausible_test".into()),
            StoreOp::Get("plausible_ignore".into()),
        ]
    );
}

#[tokio::test]
async fn unavailable_storage_never_blocks_sending() {
    let throwing: Arc<dyn StorageScope> = Arc::new(StoreScope::new(Arc::new(ThrowingStore)));
    let failing: Arc<dyn StorageScope> = Arc::new(FailingScope::default());
    let panicking: Arc<dyn StorageScope> = Arc::new(PanickingScope);
    let empty: Arc<dyn StorageScope> = Arc::new(EmptyScope);
    let scopes = [throwing, failing, panicking, empty];
    for scope in scopes {
        let transport = Arc::new(RecordingTransport::new());
        let env = env(page("site.com"), scope, transport.clone());
        let outcome = send_event("pageview", &config(false), None, &env);
        assert!(outcome.is_dispatched());
        outcome.wait().await;
        assert_eq!(transport.request_count(), 1);
    }
}

#[tokio::test]
async fn failed_flag_read_does_not_suppress() {
    let store = Arc::new(JournalingStore::new().rejecting_reads());
    let transport = Arc::new(RecordingTransport::new());
    let env = env(page("site.com"), Arc::new(StoreScope::new(store)), transport.clone());

    let outcome = send_event("pageview", &config(false), None, &env);
    assert!(outcome.wait().await.is_some());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn panicking_flag_read_does_not_escape_send() {
    let store = Arc::new(JournalingStore::new().panicking_reads());
    let transport = Arc::new(RecordingTransport::new());
    let env = env(page("site.com"), Arc::new(StoreScope::new(store.clone())), transport.clone());

    let sent = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        send_event("pageview", &config(false), None, &env)
    }));
    let outcome = sent.expect("a store panic must not reach the caller");
    assert!(outcome.is_dispatched());
    assert!(outcome.wait().await.is_some());
    assert_eq!(transport.request_count(), 1);
    assert!(store.ops().contains(&StoreOp::Get("plausible_ignore".into())));
}

// ── Payload and transmission ─────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_pageview_matches_golden_request() {
    let fixture = test_fixtures::pageview_request();
    let transport = Arc::new(RecordingTransport::new());
    let env = env(page("site.com"), Arc::new(EmptyScope), transport.clone());
    let count = Arc::new(AtomicUsize::new(0));

    let outcome = send_event(
        &fixture.event_name,
        &fixture.config,
        Some(counting_options(&count)),
        &env,
    );
    let delivery = outcome.wait().await;
    assert_eq!(delivery, Some(Delivery::Delivered { status: 202 }));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, fixture.expected_url);
    assert_eq!(requests[0].content_type, fixture.expected_content_type);
    assert_eq!(requests[0].body, fixture.expected_body);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn props_travel_as_encoded_p_field() {
    let transport = Arc::new(RecordingTransport::new());
    let env = remote_env(transport.clone());
    let options = EventOptions::new().with_prop("a", "1").with_prop("b", "2");

    send_event("Signup", &config(false), Some(options), &env)
        .wait()
        .await;

    let body: serde_json::Value = serde_json::from_str(&transport.requests()[0].body).unwrap();
    assert_eq!(body["n"], "Signup");
    let p: serde_json::Value = serde_json::from_str(body["p"].as_str().unwrap()).unwrap();
    assert_eq!(p, serde_json::json!({"a": "1", "b": "2"}));
}

#[tokio::test]
async fn no_props_means_no_p_key() {
    let transport = Arc::new(RecordingTransport::new());
    let env = remote_env(transport.clone());

    send_event("pageview", &config(false), Some(EventOptions::new()), &env)
        .wait()
        .await;

    let body: serde_json::Value = serde_json::from_str(&transport.requests()[0].body).unwrap();
    assert!(body.get("p").is_none());
    assert!(body["r"].is_null());
}

#[tokio::test]
async fn empty_props_map_means_no_p_key() {
    let transport = Arc::new(RecordingTransport::new());
    let env = remote_env(transport.clone());
    let options = EventOptions::new().with_props(Default::default());

    send_event("Signup", &config(false), Some(options), &env)
        .wait()
        .await;

    let body: serde_json::Value = serde_json::from_str(&transport.requests()[0].body).unwrap();
    assert!(body.get("p").is_none());
}

// ── Completion ───────────────────────────────────────────────────────────

#[tokio::test]
async fn callback_fires_even_when_transport_fails() {
    for reply in [
        Reply::Status(500),
        Reply::Status(404),
        Reply::NetworkError("dns failure".into()),
        Reply::Timeout,
    ] {
        let transport = Arc::new(RecordingTransport::replying(reply.clone()));
        let env = remote_env(transport.clone());
        let count = Arc::new(AtomicUsize::new(0));

        let outcome = send_event("pageview", &config(false), Some(counting_options(&count)), &env);
        assert!(outcome.wait().await.is_some(), "{reply:?}");
        assert_eq!(count.load(Ordering::SeqCst), 1, "{reply:?}");
        // No retry.
        assert_eq!(transport.request_count(), 1, "{reply:?}");
    }
}

#[tokio::test]
async fn failed_delivery_logs_no_warning() {
    let logs = LogCapture::default();
    let _guard = tracing::subscriber::set_default(logs.subscriber());
    let transport = Arc::new(RecordingTransport::replying(Reply::NetworkError(
        "connection reset".into(),
    )));
    let env = remote_env(transport);

    let delivery = send_event("pageview", &config(false), None, &env).wait().await;
    assert!(matches!(delivery, Some(Delivery::Failed { .. })));
    assert!(logs.warnings().is_empty(), "{:?}", logs.warnings());
    assert!(logs.contents().contains("event delivery failed"));
}

#[tokio::test]
async fn send_returns_before_transport_completes() {
    let (transport, gate) = RecordingTransport::gated();
    let transport = Arc::new(transport);
    let env = remote_env(transport.clone());
    let count = Arc::new(AtomicUsize::new(0));

    let outcome = send_event("pageview", &config(false), Some(counting_options(&count)), &env);
    assert!(outcome.is_dispatched());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(transport.request_count(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    gate.notify_one();
    outcome.wait().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_sends_each_fire_their_own_callback() {
    let transport = Arc::new(RecordingTransport::new());
    let env = remote_env(transport.clone());
    let count = Arc::new(AtomicUsize::new(0));

    let outcomes: Vec<_> = (0..10)
        .map(|i| {
            send_event(
                &format!("event-{i}"),
                &config(false),
                Some(counting_options(&count)),
                &env,
            )
        })
        .collect();
    for outcome in outcomes {
        outcome.wait().await;
    }

    assert_eq!(transport.request_count(), 10);
    assert_eq!(count.load(Ordering::SeqCst), 10);
}

#[test]
fn suppression_messages_are_exact() {
    assert_eq!(Suppression::Localhost.message(), LOCALHOST_WARNING);
    assert_eq!(Suppression::OptedOut.to_string(), OPT_OUT_WARNING);
}
