//! Configuration types for poly-streak

use crate::backtest::BacktestOptions;
use crate::fetch::FetchPolicy;
use crate::market::{CLOB_API_URL, GAMMA_API_URL};
use crate::telemetry::LogFormat;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    /// Defaults for backtest options; CLI flags override them
    pub backtest: BacktestOptions,
    pub telemetry: TelemetryConfig,
    pub notify: NotifyConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Gamma API base URL (market lookup)
    pub gamma_url: String,
    /// CLOB API base URL (last trade and price history)
    pub clob_url: String,
    pub user_agent: String,
    /// Per-attempt timeout
    pub timeout_ms: u64,
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Base backoff, doubled after every failed attempt
    pub backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            gamma_url: GAMMA_API_URL.to_string(),
            clob_url: CLOB_API_URL.to_string(),
            user_agent: concat!("poly-streak/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 9_000,
            retries: 2,
            backoff_ms: 250,
        }
    }
}

impl UpstreamConfig {
    /// Fetch policy derived from the timeout and retry settings
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            retries: self.retries,
            backoff: Duration::from_millis(self.backoff_ms),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when absent
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Notification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Discord webhook receiving a summary after each backtest
    pub discord_webhook_url: Option<String>,
    /// Webhook request timeout
    pub timeout_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            discord_webhook_url: None,
            timeout_ms: 5_000,
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}
