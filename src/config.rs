// src/config.rs
//! Runtime configuration: a TOML file with in-code defaults, plus
//! env-sourced secrets. The file path can be overridden via
//! `MONITOR_CONFIG_PATH`; a missing file just means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::decision::DecisionThresholds;

pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";
pub const ENV_CONFIG_PATH: &str = "MONITOR_CONFIG_PATH";

const ENV_DART_API_KEY: &str = "DART_API_KEY";
const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between live scan ticks.
    pub scan_interval_secs: u64,
    /// Listing depth of a live scan.
    pub max_items_per_scan: u32,
    /// Throttle between listing-page requests.
    pub page_delay_ms: u64,
    /// Throttle between outbound notifications.
    pub notify_delay_ms: u64,
    /// Per-HTTP-call timeout for DART endpoints.
    pub http_timeout_secs: u64,
    /// Defer earnings filings during the trading session (live mode only).
    pub skip_earnings_while_open: bool,
    pub thresholds: DecisionThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 5,
            max_items_per_scan: 10,
            page_delay_ms: 100,
            notify_delay_ms: 250,
            http_timeout_secs: 10,
            skip_earnings_while_open: true,
            thresholds: DecisionThresholds::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading monitor config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Env path override → default path → in-code defaults.
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            return Self::load_from(&PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(&default);
        }
        Ok(Self::default())
    }
}

/// API credentials, env-only so they never land in the config file.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub dart_api_key: String,
    pub telegram_token: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            dart_api_key: std::env::var(ENV_DART_API_KEY)
                .context("DART_API_KEY must be set")?,
            telegram_token: std::env::var(ENV_TELEGRAM_TOKEN)
                .context("TELEGRAM_BOT_TOKEN must be set")?,
        })
    }
}
