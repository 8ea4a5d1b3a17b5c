//! # Price Client Tests
//!
//! Exercises the CoinGecko client against a local mock server.

use anyhow::Result;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coin_price_bot::bot::ui_builder::popular_prices_screen;
use coin_price_bot::config::PriceApiConfig;
use coin_price_bot::errors::PriceError;
use coin_price_bot::price_client::{CoinGeckoClient, PriceSource};

mod common;
use common::coin;

fn client_for(server: &MockServer, timeout: Duration) -> CoinGeckoClient {
    let config = PriceApiConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        request_timeout: timeout,
    };
    CoinGeckoClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_known_coin_returns_price() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", "bitcoin"))
        .and(query_param("vs_currencies", "usd"))
        .and(query_param("x_cg_demo_api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bitcoin": { "usd": 64123.45 } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let price = client.usd_price(&coin("bitcoin")).await;

    assert_eq!(price, Some(64123.45));
    assert!(price.unwrap().is_finite() && price.unwrap() > 0.0);
    Ok(())
}

#[tokio::test]
async fn test_unknown_coin_is_absent() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));

    assert_eq!(client.usd_price(&coin("notacoin")).await, None);
    assert!(matches!(
        client.fetch_usd_price(&coin("notacoin")).await,
        Err(PriceError::MissingPrice(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_error_status_body_is_absent() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "status": { "error_code": 429, "error_message": "rate limited" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    assert_eq!(client.usd_price(&coin("bitcoin")).await, None);
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_absent() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));

    assert_eq!(client.usd_price(&coin("bitcoin")).await, None);
    assert!(matches!(
        client.fetch_usd_price(&coin("bitcoin")).await,
        Err(PriceError::Decode(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_absent() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "bitcoin": { "usd": 1.0 } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(200));

    assert!(matches!(
        client.fetch_usd_price(&coin("bitcoin")).await,
        Err(PriceError::Timeout(_))
    ));
    assert_eq!(client.usd_price(&coin("bitcoin")).await, None);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_provider_is_absent() -> Result<()> {
    let config = PriceApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: "test-key".to_string(),
        request_timeout: Duration::from_secs(2),
    };
    let client = CoinGeckoClient::new(&config)?;

    assert_eq!(client.usd_price(&coin("bitcoin")).await, None);
    Ok(())
}

/// The popular screen asks the provider once per listed coin, in order
#[tokio::test]
async fn test_popular_screen_fetches_each_coin() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", "bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bitcoin": { "usd": 50000 } })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let screen = popular_prices_screen(&client, Some("en")).await;

    assert!(screen.text.contains("• <b>BTC</b>: $50,000.00"));
    assert!(screen.text.contains("• <b>ETH</b>: unknown"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 7);
    Ok(())
}
