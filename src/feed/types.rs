//! Price feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Quotes returned by a single refresh, keyed by asset
pub type Quotes = HashMap<AssetId, AssetQuote>;

/// Identifies an asset both for display and for the price API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId {
    /// Short display symbol (e.g., "btc")
    symbol: String,
    /// Identifier used by the price API (e.g., "bitcoin")
    api_id: String,
}

impl AssetId {
    /// Create an asset from a display symbol and an API identifier
    pub fn new(symbol: impl Into<String>, api_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_lowercase(),
            api_id: api_id.into(),
        }
    }

    /// Bitcoin
    pub fn btc() -> Self {
        Self::new("btc", "bitcoin")
    }

    /// Ethereum
    pub fn eth() -> Self {
        Self::new("eth", "ethereum")
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl FromStr for AssetId {
    type Err = String;

    /// Accepts a known symbol ("btc", "eth") or an explicit "symbol:api_id" pair
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((symbol, api_id)) = s.split_once(':') {
            let (symbol, api_id) = (symbol.trim(), api_id.trim());
            if symbol.is_empty() || api_id.is_empty() {
                return Err(format!("invalid asset '{}': expected symbol:api_id", s));
            }
            return Ok(Self::new(symbol, api_id));
        }

        match s.to_lowercase().as_str() {
            "btc" | "bitcoin" => Ok(Self::btc()),
            "eth" | "ethereum" => Ok(Self::eth()),
            _ => Err(format!(
                "unknown asset '{}': use btc, eth or symbol:api_id",
                s
            )),
        }
    }
}

impl TryFrom<String> for AssetId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssetId> for String {
    fn from(asset: AssetId) -> Self {
        match asset.symbol.as_str() {
            "btc" if asset.api_id == "bitcoin" => asset.symbol,
            "eth" if asset.api_id == "ethereum" => asset.symbol,
            _ => format!("{}:{}", asset.symbol, asset.api_id),
        }
    }
}

/// Drop repeated assets, keeping the first occurrence of each
pub fn unique_assets(assets: impl IntoIterator<Item = AssetId>) -> Vec<AssetId> {
    let mut unique: Vec<AssetId> = Vec::new();
    for asset in assets {
        if !unique.contains(&asset) {
            unique.push(asset);
        }
    }
    unique
}

/// Last successfully fetched snapshot for one asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    /// Spot price in the quote currency
    pub price_usd: f64,
    /// Signed 24-hour change in percent
    pub change_pct_24h: f64,
}

impl AssetQuote {
    /// Create a quote, rejecting non-finite values and negative prices
    pub fn new(price_usd: f64, change_pct_24h: f64) -> Option<Self> {
        if !price_usd.is_finite() || price_usd < 0.0 || !change_pct_24h.is_finite() {
            return None;
        }
        Some(Self {
            price_usd,
            change_pct_24h,
        })
    }
}

/// Per-asset entry of the feed state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum QuoteState {
    /// No successful refresh yet
    #[default]
    Unknown,
    /// Latest successful quote, possibly stale
    Known(AssetQuote),
}

impl QuoteState {
    pub fn quote(&self) -> Option<&AssetQuote> {
        match self {
            QuoteState::Known(q) => Some(q),
            QuoteState::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, QuoteState::Known(_))
    }
}

/// Latest known quote for every tracked asset
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    entries: Vec<(AssetId, QuoteState)>,
    updated_at: Option<DateTime<Utc>>,
}

impl FeedState {
    /// Create a state with every asset unknown; repeated assets are tracked once
    pub fn new(assets: &[AssetId]) -> Self {
        Self {
            entries: unique_assets(assets.iter().cloned())
                .into_iter()
                .map(|a| (a, QuoteState::Unknown))
                .collect(),
            updated_at: None,
        }
    }

    /// Current entry for an asset, `None` if the asset is not tracked
    pub fn get(&self, asset: &AssetId) -> Option<&QuoteState> {
        self.entries
            .iter()
            .find(|(a, _)| a == asset)
            .map(|(_, state)| state)
    }

    /// Iterate entries in tracking order
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &QuoteState)> {
        self.entries.iter().map(|(a, s)| (a, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time of the last successful refresh
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Whether no successful refresh has happened yet
    pub fn all_unknown(&self) -> bool {
        self.entries.iter().all(|(_, s)| !s.is_known())
    }

    /// Replace every tracked asset with its fresh quote.
    ///
    /// `quotes` must hold every tracked asset; debug builds assert it.
    pub fn apply(&mut self, quotes: &Quotes, at: DateTime<Utc>) {
        debug_assert!(
            self.entries.iter().all(|(asset, _)| quotes.contains_key(asset)),
            "apply called with an incomplete quote set"
        );
        for (asset, state) in self.entries.iter_mut() {
            if let Some(quote) = quotes.get(asset) {
                *state = QuoteState::Known(*quote);
            }
        }
        self.updated_at = Some(at);
    }
}
