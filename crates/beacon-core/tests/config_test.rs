//! Tests for the beacon configuration system.

use std::sync::Mutex;

use beacon_core::config::{BeaconConfig, ConfigOverrides};
use beacon_core::errors::ConfigError;

/// Serializes tests that touch process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const BEACON_ENV_VARS: [&str; 6] = [
    "BEACON_API_HOST",
    "BEACON_DOMAIN",
    "BEACON_HASH_MODE",
    "BEACON_TRACK_LOCALHOST",
    "BEACON_TIMEOUT_SECS",
    "BEACON_STORAGE_PATH",
];

fn clear_beacon_env_vars() {
    for key in BEACON_ENV_VARS {
        std::env::remove_var(key);
    }
}

/// Point HOME at an empty directory so a developer's own
/// `~/.beacon/config.toml` never leaks into a test.
fn isolated_home() -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", home.path());
    home
}

#[test]
fn empty_toml_yields_defaults() {
    let config = BeaconConfig::from_toml("").unwrap();
    assert_eq!(config.tracker.effective_api_host(), "https://plausible.io");
    assert!(config.tracker.domain.is_none());
    assert!(!config.tracker.effective_hash_mode());
    assert!(!config.tracker.effective_track_localhost());
    assert_eq!(config.transport.effective_timeout_secs(), 10);
    assert!(config.transport.effective_user_agent().starts_with("beacon/"));
    assert!(!config.storage.is_durable());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let config = BeaconConfig::from_toml(
        r#"
[tracker]
api_host = "https://stats.example.com"
track_localhost = true

[storage]
path = "/var/lib/beacon/store.db"
"#,
    )
    .unwrap();
    assert_eq!(config.tracker.effective_api_host(), "https://stats.example.com");
    assert!(config.tracker.effective_track_localhost());
    assert!(!config.tracker.effective_hash_mode());
    assert!(config.storage.is_durable());
}

#[test]
fn unknown_keys_are_ignored() {
    let config = BeaconConfig::from_toml(
        r#"
[tracker]
domain = "site.com"
future_option = 42
"#,
    )
    .unwrap();
    assert_eq!(config.tracker.domain.as_deref(), Some("site.com"));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = BeaconConfig::from_toml("[tracker\napi_host = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn api_host_without_scheme_is_rejected() {
    let err = BeaconConfig::from_toml("[tracker]\napi_host = \"stats.example.com\"").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "tracker.api_host"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn api_host_with_trailing_slash_is_rejected() {
    let err =
        BeaconConfig::from_toml("[tracker]\napi_host = \"https://stats.example.com/\"").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn zero_timeout_is_rejected() {
    let err = BeaconConfig::from_toml("[transport]\ntimeout_secs = 0").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "transport.timeout_secs"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn layered_resolution_prefers_overrides_then_env_then_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_beacon_env_vars();
    let _home = isolated_home();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("beacon.toml"),
        r#"
[tracker]
api_host = "https://project.example.com"
domain = "project.com"

[transport]
timeout_secs = 30
"#,
    )
    .unwrap();

    std::env::set_var("BEACON_DOMAIN", "env.com");
    std::env::set_var("BEACON_TIMEOUT_SECS", "20");

    let overrides = ConfigOverrides {
        timeout_secs: Some(5),
        ..Default::default()
    };
    let config = BeaconConfig::load(dir.path(), Some(&overrides)).unwrap();

    // Project value survives where nothing overrides it.
    assert_eq!(config.tracker.effective_api_host(), "https://project.example.com");
    // Env beats project.
    assert_eq!(config.tracker.domain.as_deref(), Some("env.com"));
    // Overrides beat env.
    assert_eq!(config.transport.effective_timeout_secs(), 5);

    clear_beacon_env_vars();
}

#[test]
fn load_without_files_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_beacon_env_vars();
    let _home = isolated_home();

    let dir = tempfile::tempdir().unwrap();
    let config = BeaconConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.tracker.effective_api_host(), "https://plausible.io");
    assert_eq!(config.transport.effective_timeout_secs(), 10);
}

#[test]
fn user_config_is_lowest_file_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_beacon_env_vars();
    let home = isolated_home();

    let user_dir = home.path().join(".beacon");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        "[tracker]\nhash_mode = true\ndomain = \"user.com\"\n",
    )
    .unwrap();

    let project = tempfile::tempdir().unwrap();
    std::fs::write(project.path().join("beacon.toml"), "[tracker]\ndomain = \"project.com\"\n")
        .unwrap();

    let config = BeaconConfig::load(project.path(), None).unwrap();
    assert!(config.tracker.effective_hash_mode());
    assert_eq!(config.tracker.domain.as_deref(), Some("project.com"));
}

#[test]
fn unparseable_env_values_are_skipped() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_beacon_env_vars();
    let _home = isolated_home();

    std::env::set_var("BEACON_TRACK_LOCALHOST", "yes please");
    let dir = tempfile::tempdir().unwrap();
    let config = BeaconConfig::load(dir.path(), None).unwrap();
    assert!(config.tracker.track_localhost.is_none());

    clear_beacon_env_vars();
}

#[test]
fn config_round_trips_through_toml() {
    let config = BeaconConfig::from_toml(
        "[tracker]\napi_host = \"https://stats.example.com\"\nhash_mode = true\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let reparsed = BeaconConfig::from_toml(&rendered).unwrap();
    assert_eq!(reparsed.tracker.api_host, config.tracker.api_host);
    assert_eq!(reparsed.tracker.hash_mode, Some(true));
}
