//! Application configuration and persistence.
//!
//! The user's config file is the only thing written to disk: network choice,
//! endpoint overrides, cache and reconciliation tuning, and the last account.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{DEFAULT_ACTIVE_ERA_TTL, DEFAULT_CACHE_CAPACITY};
use crate::types::Network;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Other configuration error.
    #[error("{0}")]
    Other(String),
}

/// Network preference as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NetworkConfig {
    #[default]
    Polkadot,
    Kusama,
    Westend,
    Paseo,
}

impl NetworkConfig {
    pub fn to_network(self) -> Network {
        match self {
            NetworkConfig::Polkadot => Network::Polkadot,
            NetworkConfig::Kusama => Network::Kusama,
            NetworkConfig::Westend => Network::Westend,
            NetworkConfig::Paseo => Network::Paseo,
        }
    }
}

impl From<Network> for NetworkConfig {
    fn from(network: Network) -> Self {
        match network {
            Network::Polkadot => NetworkConfig::Polkadot,
            Network::Kusama => NetworkConfig::Kusama,
            Network::Westend => NetworkConfig::Westend,
            Network::Paseo => NetworkConfig::Paseo,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    /// Asset Hub RPC override (staking pallets live here).
    #[serde(default)]
    pub asset_hub_rpc: Option<String>,
    /// Relay chain RPC override (active session validators).
    #[serde(default)]
    pub relay_rpc: Option<String>,
    /// People chain RPC override (identities).
    #[serde(default)]
    pub people_rpc: Option<String>,
    /// Fixed delay before re-reading state after a write. `None` re-reads as
    /// soon as the write is finalized.
    #[serde(default)]
    pub reconcile_delay_secs: Option<u64>,
    /// Lifetime of the active era's cached validator list.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Number of eras kept in the validator cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_identity_timeout_secs")]
    pub identity_timeout_secs: u64,
    /// Last inspected account address.
    #[serde(default)]
    pub last_account: Option<String>,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_ACTIVE_ERA_TTL.as_secs()
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_identity_timeout_secs() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::Polkadot,
            asset_hub_rpc: None,
            relay_rpc: None,
            people_rpc: None,
            reconcile_delay_secs: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            identity_timeout_secs: default_identity_timeout_secs(),
            last_account: None,
        }
    }
}

impl AppConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(self.identity_timeout_secs)
    }

    pub fn reconcile_delay(&self) -> Option<Duration> {
        self.reconcile_delay_secs.map(Duration::from_secs)
    }
}

// ==================== Path Utilities ====================

/// Get the config directory.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("xyz", "stakedash", "stakedash")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))
}

/// Get the config file path.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join("config.json"))
}

// ==================== Config I/O ====================

/// Load configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from `path`; a missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path()?)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
