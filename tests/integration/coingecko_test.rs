//! Integration tests for the CoinGecko client against a local stub

mod common;

use common::{closed_base_url, StubResponse, StubServer};
use price_pulse::feed::{
    refresh_once, AssetId, AssetQuote, CoinGeckoClient, CoinGeckoConfig, FetchError, QuoteSource,
};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn client_for(base_url: String) -> CoinGeckoClient {
    CoinGeckoClient::with_config(CoinGeckoConfig {
        base_url,
        timeout: Duration::from_millis(500),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_batch_success() {
    let server = StubServer::start(vec![StubResponse::ok(
        r#"{"bitcoin":{"usd":65000,"usd_24h_change":2.5},"ethereum":{"usd":3200.25,"usd_24h_change":-0.75}}"#,
    )])
    .await;
    let client = client_for(server.base_url());

    let quotes = assert_ok!(client.fetch_quotes(&[AssetId::btc(), AssetId::eth()]).await);
    assert_eq!(
        quotes[&AssetId::btc()],
        AssetQuote::new(65000.0, 2.5).unwrap()
    );
    assert_eq!(quotes[&AssetId::eth()].change_pct_24h, -0.75);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /api/v3/simple/price?"));
    assert!(requests[0].contains("ids=bitcoin%2Cethereum"));
    assert!(requests[0].contains("vs_currencies=usd"));
    assert!(requests[0].contains("include_24hr_change=true"));
}

#[tokio::test]
async fn test_fetch_http_error() {
    let server = StubServer::start(vec![StubResponse::status(429, "rate limited")]).await;
    let client = client_for(server.base_url());

    let err = assert_err!(client.fetch_quotes(&[AssetId::btc()]).await);
    assert_eq!(
        err,
        FetchError::Http {
            status: 429,
            body: "rate limited".to_string()
        }
    );
}

#[tokio::test]
async fn test_fetch_malformed_body() {
    let server = StubServer::start(vec![StubResponse::ok("<html>maintenance</html>")]).await;
    let client = client_for(server.base_url());

    let err = assert_err!(client.fetch_quotes(&[AssetId::btc()]).await);
    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_partial_body_is_total_failure() {
    let server = StubServer::start(vec![StubResponse::ok(
        r#"{"bitcoin":{"usd":65000,"usd_24h_change":2.5}}"#,
    )])
    .await;
    let client = client_for(server.base_url());

    let err = assert_err!(refresh_once(&client, &[AssetId::btc(), AssetId::eth()]).await);
    assert_eq!(err.kind(), "parse");
}

#[tokio::test]
async fn test_fetch_timeout_is_network_error() {
    let server = StubServer::start(vec![StubResponse::ok(
        r#"{"bitcoin":{"usd":65000,"usd_24h_change":2.5}}"#,
    )
    .delayed(Duration::from_secs(3))])
    .await;
    let client = client_for(server.base_url());

    let err = assert_err!(client.fetch_quotes(&[AssetId::btc()]).await);
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let client = client_for(closed_base_url().await);

    let err = assert_err!(client.fetch_quotes(&[AssetId::btc()]).await);
    assert_eq!(err.kind(), "network");
}
