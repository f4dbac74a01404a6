//! Plain-text panel

use super::{format::QuoteDisplay, Strings};
use crate::feed::{AssetId, FeedState};
use chrono::Local;
use std::fmt::Write;

/// TradingView chart for the asset's USDT pair on Binance
pub fn chart_url(asset: &AssetId) -> String {
    format!(
        "https://www.tradingview.com/chart/?symbol=BINANCE%3A{}USDT",
        asset.symbol().to_uppercase()
    )
}

/// Render the feed state as a text panel
pub fn render_panel(state: &FeedState, strings: &Strings) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", strings.owner);
    let _ = writeln!(out, "{}", strings.tagline);

    for (asset, entry) in state.iter() {
        let display = QuoteDisplay::from_state(entry);
        let arrow = display.direction.map(|d| d.arrow()).unwrap_or("");

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}{}",
            asset.symbol().to_uppercase(),
            strings.market_suffix
        );
        let _ = writeln!(out, "  {:<12} {}", strings.price, display.price);
        let _ = writeln!(
            out,
            "  {:<12} {} {}",
            strings.change_24h, arrow, display.change
        );
        let _ = writeln!(out, "  {:<12} {}", strings.chart, chart_url(asset));
    }

    let updated = state
        .updated_at()
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| strings.never_updated.to_string());
    let _ = writeln!(out);
    let _ = write!(out, "{}: {}", strings.updated, updated);

    out
}
