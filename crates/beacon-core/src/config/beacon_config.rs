//! Top-level beacon configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{StorageConfig, TrackerConfig, TransportConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`BEACON_*`)
/// 3. Project config (`beacon.toml` in project root)
/// 4. User config (`~/.beacon/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BeaconConfig {
    pub tracker: TrackerConfig,
    pub transport: TransportConfig,
    pub storage: StorageConfig,
}

/// Override values supplied by the embedding program.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_host: Option<String>,
    pub domain: Option<String>,
    pub hash_mode: Option<bool>,
    pub track_localhost: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl BeaconConfig {
    /// Load configuration with layered resolution. See the type docs for
    /// the order.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    // An unreadable user config is not fatal.
                    Err(_) => {}
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("beacon.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &BeaconConfig) -> Result<(), ConfigError> {
        if let Some(ref host) = config.tracker.api_host {
            if !(host.starts_with("http://") || host.starts_with("https://")) {
                return Err(ConfigError::ValidationFailed {
                    field: "tracker.api_host".to_string(),
                    message: "must start with http:// or https://".to_string(),
                });
            }
            if host.ends_with('/') {
                return Err(ConfigError::ValidationFailed {
                    field: "tracker.api_host".to_string(),
                    message: "must not end with a trailing slash".to_string(),
                });
            }
        }
        if let Some(ref domain) = config.tracker.domain {
            if domain.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "tracker.domain".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if config.transport.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "transport.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.beacon/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".beacon").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut BeaconConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: BeaconConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut BeaconConfig, other: &BeaconConfig) {
        // Tracker
        if other.tracker.api_host.is_some() {
            base.tracker.api_host = other.tracker.api_host.clone();
        }
        if other.tracker.domain.is_some() {
            base.tracker.domain = other.tracker.domain.clone();
        }
        if other.tracker.hash_mode.is_some() {
            base.tracker.hash_mode = other.tracker.hash_mode;
        }
        if other.tracker.track_localhost.is_some() {
            base.tracker.track_localhost = other.tracker.track_localhost;
        }

        // Transport
        if other.transport.timeout_secs.is_some() {
            base.transport.timeout_secs = other.transport.timeout_secs;
        }
        if other.transport.user_agent.is_some() {
            base.transport.user_agent = other.transport.user_agent.clone();
        }

        // Storage
        if other.storage.path.is_some() {
            base.storage.path = other.storage.path.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `BEACON_API_HOST`, `BEACON_TRACK_LOCALHOST`, etc.
    fn apply_env_overrides(config: &mut BeaconConfig) {
        if let Ok(val) = std::env::var("BEACON_API_HOST") {
            config.tracker.api_host = Some(val);
        }
        if let Ok(val) = std::env::var("BEACON_DOMAIN") {
            config.tracker.domain = Some(val);
        }
        if let Ok(val) = std::env::var("BEACON_HASH_MODE") {
            if let Ok(v) = val.parse::<bool>() {
                config.tracker.hash_mode = Some(v);
            }
        }
        if let Ok(val) = std::env::var("BEACON_TRACK_LOCALHOST") {
            if let Ok(v) = val.parse::<bool>() {
                config.tracker.track_localhost = Some(v);
            }
        }
        if let Ok(val) = std::env::var("BEACON_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.transport.timeout_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("BEACON_STORAGE_PATH") {
            config.storage.path = Some(PathBuf::from(val));
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut BeaconConfig, o: &ConfigOverrides) {
        if let Some(ref v) = o.api_host {
            config.tracker.api_host = Some(v.clone());
        }
        if let Some(ref v) = o.domain {
            config.tracker.domain = Some(v.clone());
        }
        if let Some(v) = o.hash_mode {
            config.tracker.hash_mode = Some(v);
        }
        if let Some(v) = o.track_localhost {
            config.tracker.track_localhost = Some(v);
        }
        if let Some(v) = o.timeout_secs {
            config.transport.timeout_secs = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
