//! Prometheus metrics

use crate::feed::{AssetId, AssetQuote};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Outcome of one refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All requested quotes received
    Success,
    /// Transport failure or timeout
    Network,
    /// Non-success HTTP status
    Http,
    /// Malformed or partial body
    Parse,
}

impl RefreshOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshOutcome::Success => "success",
            RefreshOutcome::Network => "network",
            RefreshOutcome::Http => "http",
            RefreshOutcome::Parse => "parse",
        }
    }
}

/// Install the Prometheus exporter with an HTTP listener on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Record the latency and outcome of a refresh
pub fn record_refresh(outcome: RefreshOutcome, duration: Duration) {
    metrics::counter!("pricepulse_refresh_total", "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!("pricepulse_refresh_latency_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Publish the latest quote of an asset
pub fn set_quote(asset: &AssetId, quote: &AssetQuote) {
    let symbol = asset.symbol().to_string();
    metrics::gauge!("pricepulse_price_usd", "asset" => symbol.clone()).set(quote.price_usd);
    metrics::gauge!("pricepulse_change_pct_24h", "asset" => symbol).set(quote.change_pct_24h);
}

/// Count a tick skipped because a refresh was still in flight
pub fn record_skipped_tick() {
    metrics::counter!("pricepulse_skipped_ticks_total").increment(1);
}
