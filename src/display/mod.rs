//! Presentation of feed state
//!
//! Pure functions only: number formatting, up/down classification, the
//! static translation tables and the text panel.

mod format;
mod i18n;
mod render;

pub use format::{classify, format_change, format_price, Direction, QuoteDisplay, PRICE_PLACEHOLDER};
pub use i18n::{Language, Strings};
pub use render::{chart_url, render_panel};
