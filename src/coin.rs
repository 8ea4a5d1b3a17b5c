//! Coin identifiers and price formatting helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coins offered on the single-coin picker: (coin id, localization key)
pub const PICKER_COINS: [(&str, &str); 7] = [
    ("bitcoin", "coin-name-bitcoin"),
    ("ethereum", "coin-name-ethereum"),
    ("tether", "coin-name-tether"),
    ("cardano", "coin-name-cardano"),
    ("solana", "coin-name-solana"),
    ("ripple", "coin-name-ripple"),
    ("polkadot", "coin-name-polkadot"),
];

/// Coins listed on the popular prices screen: (coin id, ticker)
pub const POPULAR_COINS: [(&str, &str); 7] = [
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("tether", "USDT"),
    ("binancecoin", "BNB"),
    ("solana", "SOL"),
    ("ripple", "XRP"),
    ("cardano", "ADA"),
];

/// A price provider coin identifier such as `bitcoin`
///
/// Always trimmed, lowercase and non-empty. Beyond that the value is passed
/// to the provider verbatim; an unknown id simply yields no price.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinId(String);

impl CoinId {
    /// Normalize user input into a coin id, rejecting blank input
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case form used in comparison messages
    pub fn upper(&self) -> String {
        self.0.to_uppercase()
    }

    /// First letter capitalized, used in price titles
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format a USD amount with thousands separators and two decimals
///
/// `50000.0` becomes `50,000.00`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Format a ratio with six decimals
pub fn format_ratio(value: f64) -> String {
    format!("{value:.6}")
}

/// A quote worth showing on the price and popular screens
///
/// A zero quote is treated like a missing one there; the compare result
/// still shows it and guards the ratio instead.
pub fn displayable_price(price: Option<f64>) -> Option<f64> {
    price.filter(|price| *price != 0.0)
}
