//! CLI interface for price-pulse
//!
//! Provides subcommands for:
//! - `watch`: Poll prices and redraw the panel on every update
//! - `once`: Fetch quotes once and print the panel
//! - `config`: Show the effective configuration

mod once;
mod watch;

pub use once::OnceArgs;
pub use watch::WatchArgs;

use crate::config::Config;
use crate::display::Language;
use crate::feed::{unique_assets, AssetId};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-pulse")]
#[command(about = "Terminal ticker for crypto spot price and 24h change")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll prices until interrupted
    Watch(WatchArgs),
    /// Fetch quotes once
    Once(OnceArgs),
    /// Show configuration
    Config,
}

/// Overrides shared by the feed commands
#[derive(Args, Debug, Default)]
pub struct FeedOverrides {
    /// Assets to track, comma separated (btc, eth or symbol:coingecko_id)
    #[arg(short, long, value_delimiter = ',')]
    pub assets: Option<Vec<AssetId>>,

    /// Display language (en, zh)
    #[arg(short, long)]
    pub lang: Option<Language>,
}

impl FeedOverrides {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(assets) = &self.assets {
            config.feed.assets = unique_assets(assets.iter().cloned());
        }
        if let Some(lang) = self.lang {
            config.display.language = lang;
        }
    }
}

/// Print the effective configuration
pub fn print_config(config: &Config) {
    let assets = config
        .feed
        .assets
        .iter()
        .map(|a| format!("{} ({})", a.symbol(), a.api_id()))
        .collect::<Vec<_>>()
        .join(", ");

    println!("Current configuration:");
    println!("  Source: {}", config.feed.base_url);
    println!("  Assets: {}", assets);
    println!("  Quote currency: {}", config.feed.vs_currency);
    println!(
        "  Refresh: every {}s (timeout {}s)",
        config.feed.refresh_interval_secs, config.feed.request_timeout_secs
    );
    println!("  Language: {}", config.display.language);
    println!(
        "  Logging: {} ({:?})",
        config.telemetry.log_level, config.telemetry.log_format
    );
    match config.telemetry.metrics_port {
        Some(port) => println!("  Metrics: port {}", port),
        None => println!("  Metrics: disabled"),
    }
}
