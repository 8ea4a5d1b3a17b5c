//! # Error Types Module
//!
//! This module defines the error types used by the price client and the
//! configuration loader. Neither ever reaches a chat user directly: price
//! errors are logged and collapsed to "price unavailable", configuration
//! errors abort startup.

/// Errors raised while fetching a price from the provider
#[derive(Debug)]
pub enum PriceError {
    /// Connection, TLS or other transport failures
    Transport(String),
    /// The request exceeded the configured timeout
    Timeout(String),
    /// The response body was not the expected JSON shape
    Decode(String),
    /// The body was valid but carried no USD price for the coin
    MissingPrice(String),
}

impl std::fmt::Display for PriceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceError::Transport(msg) => write!(f, "Transport error: {msg}"),
            PriceError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            PriceError::Decode(msg) => write!(f, "Decode error: {msg}"),
            PriceError::MissingPrice(coin) => write!(f, "No USD price for coin: {coin}"),
        }
    }
}

impl std::error::Error for PriceError {}

impl From<reqwest::Error> for PriceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PriceError::Timeout(err.to_string())
        } else if err.is_decode() {
            PriceError::Decode(err.to_string())
        } else {
            PriceError::Transport(err.to_string())
        }
    }
}

/// Errors raised while loading the process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    Missing(&'static str),
    /// A variable is present but cannot be parsed
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
