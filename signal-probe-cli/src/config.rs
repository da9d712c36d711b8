//! Probe configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Probe configuration (loaded from probes.toml)
///
/// Every field has a default, so a missing or partial file still yields a
/// runnable configuration. Command-line flags override file values.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Sleep duration of the slow handler in the synchronous-signal probe
    #[serde(default = "default_sleep_ms")]
    pub sleep_ms: u64,

    #[serde(default)]
    pub usernames: UsernameConfig,

    #[serde(default)]
    pub rectangle: RectangleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UsernameConfig {
    #[serde(default = "default_sync_username")]
    pub sync: String,
    #[serde(default = "default_thread_username")]
    pub thread: String,
    #[serde(default = "default_rollback_username")]
    pub rollback: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RectangleConfig {
    #[serde(default = "default_length")]
    pub length: i64,
    #[serde(default = "default_width")]
    pub width: i64,
}

fn default_sleep_ms() -> u64 {
    3000
}

fn default_sync_username() -> String {
    "sync_probe_user".to_string()
}

fn default_thread_username() -> String {
    "thread_probe_user".to_string()
}

fn default_rollback_username() -> String {
    "rollback_user".to_string()
}

fn default_length() -> i64 {
    10
}

fn default_width() -> i64 {
    5
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sleep_ms: default_sleep_ms(),
            usernames: UsernameConfig::default(),
            rectangle: RectangleConfig::default(),
        }
    }
}

impl Default for UsernameConfig {
    fn default() -> Self {
        Self {
            sync: default_sync_username(),
            thread: default_thread_username(),
            rollback: default_rollback_username(),
        }
    }
}

impl Default for RectangleConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            width: default_width(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<ProbeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: ProbeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
