//! Integration tests for the price feed state machine

use async_trait::async_trait;
use price_pulse::display::{classify, Direction};
use price_pulse::feed::{
    parse_simple_price, refresh_once, AssetId, AssetQuote, FeedState, FetchError, PriceFeed,
    QuoteSource, QuoteState, Quotes,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves canned simple-price bodies through the real parser
struct BodySource {
    bodies: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: AtomicUsize,
}

impl BodySource {
    fn new(bodies: Vec<Result<&str, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            bodies: Mutex::new(bodies.into_iter().map(|b| b.map(str::to_string)).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for BodySource {
    async fn fetch_quotes(&self, assets: &[AssetId]) -> Result<Quotes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .bodies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no more bodies".to_string())));
        parse_simple_price(&next?, assets, "usd")
    }
}

const BTC_BODY: &str = r#"{"bitcoin":{"usd":65000,"usd_24h_change":2.5}}"#;

fn known(price: f64, change: f64) -> QuoteState {
    QuoteState::Known(AssetQuote::new(price, change).unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_scenario_first_success() {
    let source = BodySource::new(vec![Ok(BTC_BODY)]);
    let handle = PriceFeed::new(source.clone())
        .assets([AssetId::btc()])
        .start(|_| {});

    assert_eq!(handle.state().get(&AssetId::btc()), Some(&QuoteState::Unknown));

    let mut rx = handle.subscribe();
    rx.changed().await.unwrap();
    assert_eq!(handle.state().get(&AssetId::btc()), Some(&known(65000.0, 2.5)));
}

#[tokio::test(start_paused = true)]
async fn test_scenario_timeout_keeps_known_quote() {
    let source = BodySource::new(vec![
        Ok(BTC_BODY),
        Err(FetchError::Network("request timed out".to_string())),
    ]);
    let handle = PriceFeed::new(source.clone())
        .assets([AssetId::btc()])
        .interval(Duration::from_secs(30))
        .start(|_| {});

    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(handle.state().get(&AssetId::btc()), Some(&known(65000.0, 2.5)));
}

#[tokio::test(start_paused = true)]
async fn test_scenario_partial_response_changes_nothing() {
    let source = BodySource::new(vec![Ok(BTC_BODY)]);
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);

    let handle = PriceFeed::new(source.clone())
        .assets([AssetId::btc(), AssetId::eth()])
        .start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(updates.load(Ordering::SeqCst), 0);

    let state = handle.state();
    assert_eq!(state.get(&AssetId::btc()), Some(&QuoteState::Unknown));
    assert_eq!(state.get(&AssetId::eth()), Some(&QuoteState::Unknown));
}

#[tokio::test(start_paused = true)]
async fn test_partial_response_keeps_known_quotes() {
    let source = BodySource::new(vec![
        Ok(r#"{"bitcoin":{"usd":65000,"usd_24h_change":2.5},"ethereum":{"usd":3200,"usd_24h_change":-1.5}}"#),
        Ok(r#"{"bitcoin":{"usd":70000,"usd_24h_change":9.0}}"#),
    ]);
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);

    let handle = PriceFeed::new(source.clone())
        .assets([AssetId::btc(), AssetId::eth()])
        .interval(Duration::from_secs(30))
        .start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(updates.load(Ordering::SeqCst), 1);

    let state = handle.state();
    assert_eq!(state.get(&AssetId::btc()), Some(&known(65000.0, 2.5)));
    assert_eq!(state.get(&AssetId::eth()), Some(&known(3200.0, -1.5)));
}

#[tokio::test]
async fn test_refresh_once_with_repeated_assets() {
    let source = BodySource::new(vec![Ok(BTC_BODY)]);
    let assets = [AssetId::btc(), "btc:bitcoin".parse().unwrap()];

    let quotes = refresh_once(source.as_ref(), &assets).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[&AssetId::btc()], AssetQuote::new(65000.0, 2.5).unwrap());

    let mut state = FeedState::new(&assets);
    state.apply(&quotes, chrono::Utc::now());
    assert_eq!(state.len(), 1);
    assert_eq!(state.get(&AssetId::btc()), Some(&known(65000.0, 2.5)));
}

#[tokio::test(start_paused = true)]
async fn test_scenario_stop_before_first_tick() {
    let source = BodySource::new(vec![Ok(BTC_BODY)]);
    let handle = PriceFeed::new(source.clone())
        .assets([AssetId::btc(), AssetId::eth()])
        .start(|_| {});
    handle.stop();

    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(source.calls(), 0);
    assert!(handle.state().all_unknown());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_feed() {
    let source = BodySource::new(vec![Ok(BTC_BODY), Ok(BTC_BODY), Ok(BTC_BODY)]);
    let handle = PriceFeed::new(source.clone())
        .interval(Duration::from_secs(10))
        .start(|_| {});

    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(handle);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_refresh_once_is_idempotent() {
    let source = BodySource::new(vec![Ok(BTC_BODY), Ok(BTC_BODY)]);
    let assets = [AssetId::btc()];
    let at = chrono::Utc::now();

    let mut first = FeedState::new(&assets);
    first.apply(&refresh_once(source.as_ref(), &assets).await.unwrap(), at);

    let mut second = first.clone();
    second.apply(&refresh_once(source.as_ref(), &assets).await.unwrap(), at);

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_non_numeric_field_is_failure() {
    let source = BodySource::new(vec![Ok(
        r#"{"bitcoin":{"usd":"n/a","usd_24h_change":2.5}}"#,
    )]);
    let err = refresh_once(source.as_ref(), &[AssetId::btc()])
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[test]
fn test_parse_matches_serialized_quote() {
    let quote = AssetQuote::new(43123.45, -3.21).unwrap();
    let body = serde_json::json!({
        "bitcoin": { "usd": quote.price_usd, "usd_24h_change": quote.change_pct_24h }
    })
    .to_string();

    let quotes = parse_simple_price(&body, &[AssetId::btc()], "usd").unwrap();
    assert_eq!(quotes[&AssetId::btc()], quote);
}

#[test]
fn test_classification_boundary() {
    assert_eq!(classify(0.0), Direction::Up);
    assert_eq!(classify(-0.01), Direction::Down);
    assert_eq!(classify(12.3), Direction::Up);
}
