//! price-pulse: terminal ticker for crypto spot prices
//!
//! This library provides:
//! - A periodically refreshed price feed with stale-on-failure semantics
//! - A CoinGecko simple-price source
//! - Pure display helpers and English/Chinese string tables
//! - TOML configuration, structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod display;
pub mod feed;
pub mod telemetry;
