//! CoinGecko simple-price client
//!
//! Fetches spot price and 24h change for a batch of assets in one request:
//! `GET /simple/price?ids=bitcoin,ethereum&vs_currencies=usd&include_24hr_change=true`
//!
//! The response maps each API id to an object holding `<vs>` and
//! `<vs>_24h_change`. A refresh is accepted only when every requested asset
//! is present and well-formed.

use super::{AssetId, AssetQuote, FetchError, QuoteSource, Quotes};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

/// CoinGecko public API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Quote currency (e.g., "usd")
    pub vs_currency: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            vs_currency: "usd".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for CoinGecko's simple price endpoint
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoClient {
    /// Create a client with default configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(CoinGeckoConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: CoinGeckoConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("price-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }

    /// Build the simple price URL
    fn price_url(&self) -> String {
        format!(
            "{}/simple/price",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoClient {
    async fn fetch_quotes(&self, assets: &[AssetId]) -> Result<Quotes, FetchError> {
        let ids = assets
            .iter()
            .map(|a| a.api_id())
            .collect::<Vec<_>>()
            .join(",");
        let url = self.price_url();

        tracing::debug!(url = %url, ids = %ids, "Fetching simple prices");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", ids.as_str()),
                ("vs_currencies", self.config.vs_currency.as_str()),
                ("include_24hr_change", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        tracing::trace!(
            latency_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Simple price response received"
        );

        parse_simple_price(&body, assets, &self.config.vs_currency)
    }
}

/// Parse a simple price body into quotes for exactly `assets`.
///
/// Fails if the body is not a JSON object, or if any requested asset is
/// missing, or its price or change field is absent, null, non-numeric or
/// out of range. Ids in the body that were not requested are ignored.
pub fn parse_simple_price(
    body: &str,
    assets: &[AssetId],
    vs_currency: &str,
) -> Result<Quotes, FetchError> {
    let root: Map<String, Value> = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("invalid simple price body: {}", e)))?;

    let change_field = format!("{}_24h_change", vs_currency);
    let mut quotes = Quotes::with_capacity(assets.len());

    for asset in assets {
        let entry = root
            .get(asset.api_id())
            .and_then(Value::as_object)
            .ok_or_else(|| FetchError::Parse(format!("missing quote for {}", asset.api_id())))?;

        let price = number_field(entry, vs_currency, asset)?;
        let change = number_field(entry, &change_field, asset)?;

        let quote = AssetQuote::new(price, change).ok_or_else(|| {
            FetchError::Parse(format!(
                "out of range quote for {}: price={} change={}",
                asset.api_id(),
                price,
                change
            ))
        })?;
        quotes.insert(asset.clone(), quote);
    }

    Ok(quotes)
}

fn number_field(entry: &Map<String, Value>, field: &str, asset: &AssetId) -> Result<f64, FetchError> {
    entry
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            FetchError::Parse(format!(
                "missing or non-numeric '{}' for {}",
                field,
                asset.api_id()
            ))
        })
}
