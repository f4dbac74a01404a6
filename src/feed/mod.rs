//! Price feed module
//!
//! Polls a spot price API for the latest price and 24h change of a small set
//! of assets and keeps the last good snapshot of each.

mod coingecko;
mod error;
mod poller;
mod types;

pub use coingecko::{parse_simple_price, CoinGeckoClient, CoinGeckoConfig, COINGECKO_API_URL};
pub use error::FetchError;
pub use poller::{refresh_once, FeedHandle, PriceFeed, MIN_INTERVAL};
pub use types::{unique_assets, AssetId, AssetQuote, FeedState, QuoteState, Quotes};

use async_trait::async_trait;

/// Source of batched spot quotes
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch quotes for all `assets` in a single request
    async fn fetch_quotes(&self, assets: &[AssetId]) -> Result<Quotes, FetchError>;
}
