//! # Bot Configuration Module
//!
//! This module loads the process configuration: the three required secrets
//! (bot token, price API key, required channel) and a few optional tuning
//! knobs. The resulting [`BotConfig`] is passed explicitly to everything
//! that needs it.

use std::time::Duration;

use crate::errors::ConfigError;

// Environment variable names
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const API_KEY_VAR: &str = "COINGECKO_API_KEY";
pub const CHANNEL_VAR: &str = "CHANNEL_USERNAME";
pub const API_URL_VAR: &str = "COINGECKO_API_URL";
pub const TIMEOUT_VAR: &str = "PRICE_REQUEST_TIMEOUT_SECS";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

// Defaults for optional settings
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration for the price provider client
#[derive(Debug, Clone)]
pub struct PriceApiConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// Demo API key sent as `x_cg_demo_api_key`
    pub api_key: String,
    /// Timeout applied to every price request
    pub request_timeout: Duration,
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Channel users must join, as `@username` or numeric chat id
    pub required_channel: String,
    pub price_api: PriceApiConfig,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bot_token = require(BOT_TOKEN_VAR)?;
        let api_key = require(API_KEY_VAR)?;
        let required_channel = require(CHANNEL_VAR)?;

        let base_url = get(API_URL_VAR)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: TIMEOUT_VAR,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let log_format = match get(LOG_FORMAT_VAR).map(|v| v.to_lowercase()) {
            None => LogFormat::Pretty,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: LOG_FORMAT_VAR,
                    value: v,
                })
            }
        };

        Ok(Self {
            bot_token,
            required_channel,
            price_api: PriceApiConfig {
                base_url,
                api_key,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (BOT_TOKEN_VAR, "123:abc"),
        (API_KEY_VAR, "cg-key"),
        (CHANNEL_VAR, "@prices"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = BotConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.required_channel, "@prices");
        assert_eq!(config.price_api.api_key, "cg-key");
        assert_eq!(config.price_api.base_url, DEFAULT_API_URL);
        assert_eq!(config.price_api.request_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_each_secret_is_required() {
        for missing in [BOT_TOKEN_VAR, API_KEY_VAR, CHANNEL_VAR] {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = BotConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(missing));
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = (API_KEY_VAR, "   ");
        let err = BotConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_KEY_VAR));
    }

    #[test]
    fn test_optional_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((API_URL_VAR, "http://127.0.0.1:9000/api/"));
        pairs.push((TIMEOUT_VAR, "3"));
        pairs.push((LOG_FORMAT_VAR, "JSON"));
        let config = BotConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.price_api.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.price_api.request_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for bad in ["0", "ten", "-1"] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((TIMEOUT_VAR, bad));
            let err = BotConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: TIMEOUT_VAR, .. }));
        }
    }
}
