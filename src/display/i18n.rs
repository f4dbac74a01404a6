//! Translation tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Static strings for this language
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "cn" | "chinese" => Ok(Language::Zh),
            other => Err(format!("unsupported language '{}': use en or zh", other)),
        }
    }
}

/// Display strings for one language
#[derive(Debug, PartialEq, Eq)]
pub struct Strings {
    pub owner: &'static str,
    pub tagline: &'static str,
    /// Appended to the upper-case asset symbol, e.g. "BTC Market"
    pub market_suffix: &'static str,
    pub price: &'static str,
    pub change_24h: &'static str,
    pub updated: &'static str,
    pub never_updated: &'static str,
    pub chart: &'static str,
    pub fetch_failed: &'static str,
}

static EN: Strings = Strings {
    owner: "zk",
    tagline: "Crypto Trader | Focus on Airdrops & DeFi",
    market_suffix: " Market",
    price: "Price",
    change_24h: "24h Change",
    updated: "Updated",
    never_updated: "waiting for first quote",
    chart: "Chart",
    fetch_failed: "Failed to fetch market data",
};

static ZH: Strings = Strings {
    owner: "zk",
    tagline: "加密交易员 | 专注空投与 DeFi",
    market_suffix: " 行情",
    price: "价格",
    change_24h: "24小时涨跌",
    updated: "更新时间",
    never_updated: "等待首次报价",
    chart: "图表",
    fetch_failed: "行情获取失败",
};
