//! Configuration types for price-pulse

use crate::display::Language;
use crate::feed::{unique_assets, AssetId, CoinGeckoConfig, COINGECKO_API_URL};
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::time::Duration;

/// Bundled default configuration
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml.example");

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetId>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Presentation configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub language: Language,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; exporter disabled when absent
    pub metrics_port: Option<u16>,
}

fn default_base_url() -> String {
    COINGECKO_API_URL.to_string()
}
fn default_vs_currency() -> String {
    "usd".to_string()
}
fn default_assets() -> Vec<AssetId> {
    vec![AssetId::btc()]
}
fn default_refresh_interval_secs() -> u64 {
    30
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vs_currency: default_vs_currency(),
            assets: default_assets(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl FeedConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Client settings for the CoinGecko source
    pub fn coingecko(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            base_url: self.base_url.clone(),
            vs_currency: self.vs_currency.to_lowercase(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Configuration bundled with the binary
    pub fn bundled() -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Collapse repeated assets so each is requested and shown once
    pub fn normalize(&mut self) {
        self.feed.assets = unique_assets(std::mem::take(&mut self.feed.assets));
    }

    /// Reject settings the feed cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.feed.assets.is_empty() {
            anyhow::bail!("feed.assets must list at least one asset");
        }
        if self.feed.refresh_interval_secs == 0 {
            anyhow::bail!("feed.refresh_interval_secs must be greater than zero");
        }
        if self.feed.request_timeout_secs == 0 {
            anyhow::bail!("feed.request_timeout_secs must be greater than zero");
        }
        if self.feed.vs_currency.trim().is_empty() {
            anyhow::bail!("feed.vs_currency must not be empty");
        }
        Ok(())
    }
}
