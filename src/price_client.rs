//! # Price Client Module
//!
//! Fetches USD spot prices from the CoinGecko "simple price" endpoint.
//! Every failure mode collapses to "no price": callers only ever see
//! `Option<f64>`, the detailed [`PriceError`] is logged here.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::coin::CoinId;
use crate::config::PriceApiConfig;
use crate::errors::PriceError;

/// Quote currency requested from the provider
pub const VS_CURRENCY: &str = "usd";

/// Anything able to quote a coin in USD
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// USD price of `coin`, or `None` when unavailable for any reason
    async fn usd_price(&self, coin: &CoinId) -> Option<f64>;
}

/// HTTP client for the CoinGecko simple price API
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl CoinGeckoClient {
    pub fn new(config: &PriceApiConfig) -> Result<Self, PriceError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/simple/price", config.base_url),
            api_key: config.api_key.clone(),
        })
    }

    /// Issue a single price request and extract `body[coin]["usd"]`
    pub async fn fetch_usd_price(&self, coin: &CoinId) -> Result<f64, PriceError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("ids", coin.as_str()),
                ("vs_currencies", VS_CURRENCY),
                ("x_cg_demo_api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        debug!(coin = %coin, status = %response.status(), "Price provider responded");

        // Body decode failures surface as `PriceError::Decode`
        let data: Value = response.json().await?;
        extract_usd_price(&data, coin)
    }
}

/// Pull the USD price for `coin` out of a simple price response body
pub fn extract_usd_price(data: &Value, coin: &CoinId) -> Result<f64, PriceError> {
    data.get(coin.as_str())
        .and_then(|quotes| quotes.get(VS_CURRENCY))
        .and_then(Value::as_f64)
        .ok_or_else(|| PriceError::MissingPrice(coin.to_string()))
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn usd_price(&self, coin: &CoinId) -> Option<f64> {
        match self.fetch_usd_price(coin).await {
            Ok(price) => Some(price),
            Err(PriceError::MissingPrice(_)) => {
                warn!(coin = %coin, "Coin not found in price provider response");
                None
            }
            Err(e) => {
                error!(coin = %coin, error = %e, "Failed to fetch coin price");
                None
            }
        }
    }
}
