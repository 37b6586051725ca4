//! CollectorConfig - Config Loader output
//!
//! Local configuration of the collector process: where the project settings
//! come from, how fetching retries, and dispatcher tuning.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Project settings source
    pub settings: SettingsSourceConfig,

    /// Settings fetch retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Dispatcher tuning
    #[serde(default)]
    pub dispatcher: DispatcherTuning,
}

/// Where the project settings document is read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSourceConfig {
    /// Path of the settings document (JSON or TOML)
    pub source: PathBuf,

    /// Cross-launch cache of the last fetched document
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

/// Retry policy for settings fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry (ms)
    #[serde(default = "default_first_delay_ms")]
    pub first_delay_ms: u64,

    /// Maximum delay between retries (ms)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Multiplicative growth factor
    #[serde(default = "default_factor")]
    pub factor: f64,

    /// Give up after this many failed attempts (None = until success or shutdown)
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_first_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_factor() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            first_delay_ms: default_first_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            factor: default_factor(),
            max_attempts: None,
        }
    }
}

/// Dispatcher tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherTuning {
    /// Time allowed for the coordinator to finish on shutdown (ms)
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

fn default_shutdown_timeout_ms() -> u64 {
    2_000
}

impl Default for DispatcherTuning {
    fn default() -> Self {
        Self {
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}
