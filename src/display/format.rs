//! Number formatting and change classification

use crate::feed::{AssetQuote, QuoteState};

/// Shown in place of a price that has never been fetched
pub const PRICE_PLACEHOLDER: &str = "--";

/// Direction of the 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Zero or positive change
    Up,
    /// Negative change
    Down,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
        }
    }
}

/// Classify a 24h change; zero counts as `Up`
pub fn classify(change_pct: f64) -> Direction {
    if change_pct >= 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Format a price as `$65,000.00`
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

/// Format a 24h change as `2.50%`
pub fn format_change(change_pct: f64) -> String {
    format!("{:.2}%", change_pct)
}

/// Display strings for one asset entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDisplay {
    pub price: String,
    pub change: String,
    pub direction: Option<Direction>,
}

impl QuoteDisplay {
    pub fn from_quote(quote: &AssetQuote) -> Self {
        Self {
            price: format_price(quote.price_usd),
            change: format_change(quote.change_pct_24h),
            direction: Some(classify(quote.change_pct_24h)),
        }
    }

    /// Placeholder strings for an asset with no quote yet
    pub fn placeholder() -> Self {
        Self {
            price: PRICE_PLACEHOLDER.to_string(),
            change: String::new(),
            direction: None,
        }
    }

    pub fn from_state(state: &QuoteState) -> Self {
        match state {
            QuoteState::Known(quote) => Self::from_quote(quote),
            QuoteState::Unknown => Self::placeholder(),
        }
    }
}
