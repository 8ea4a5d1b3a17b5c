//! Inline keyboard actions and their callback data encoding

use regex::Regex;
use std::sync::LazyLock;

use crate::coin::CoinId;

/// Prefix of per-coin price buttons
const PRICE_PREFIX: &str = "price_";
/// Prefix of "compare with" buttons
const COMPARE_PREFIX: &str = "compare_";

/// Coin ids accepted inside callback data; keeps the payload within
/// Telegram's 64 byte callback data limit
static CALLBACK_COIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]{0,55}$").expect("static regex"));

/// Every button action the bot understands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    CheckMembership,
    PriceSingle,
    PriceCompare,
    PopularPrices,
    Help,
    BackToMenu,
    SearchCoin,
    CoinPrice(CoinId),
    CompareWith(CoinId),
}

impl CallbackAction {
    /// Parse callback data; unknown or malformed data yields `None`
    pub fn parse(data: &str) -> Option<Self> {
        // Exact tags first: "price_single" and "price_compare" share the price_ prefix
        let action = match data {
            "check_membership" => Self::CheckMembership,
            "price_single" => Self::PriceSingle,
            "price_compare" => Self::PriceCompare,
            "popular_prices" => Self::PopularPrices,
            "help" => Self::Help,
            "back_to_menu" => Self::BackToMenu,
            "search_coin" => Self::SearchCoin,
            _ => {
                if let Some(coin) = data.strip_prefix(PRICE_PREFIX) {
                    Self::CoinPrice(callback_coin(coin)?)
                } else if let Some(coin) = data.strip_prefix(COMPARE_PREFIX) {
                    Self::CompareWith(callback_coin(coin)?)
                } else {
                    return None;
                }
            }
        };
        Some(action)
    }

    /// Callback data sent with the button
    pub fn to_data(&self) -> String {
        match self {
            Self::CheckMembership => "check_membership".to_string(),
            Self::PriceSingle => "price_single".to_string(),
            Self::PriceCompare => "price_compare".to_string(),
            Self::PopularPrices => "popular_prices".to_string(),
            Self::Help => "help".to_string(),
            Self::BackToMenu => "back_to_menu".to_string(),
            Self::SearchCoin => "search_coin".to_string(),
            Self::CoinPrice(coin) => format!("{PRICE_PREFIX}{coin}"),
            Self::CompareWith(coin) => format!("{COMPARE_PREFIX}{coin}"),
        }
    }
}

/// Whether a coin id can travel inside callback data
pub fn fits_callback_data(coin: &CoinId) -> bool {
    CALLBACK_COIN_RE.is_match(coin.as_str())
}

fn callback_coin(raw: &str) -> Option<CoinId> {
    CoinId::new(raw).filter(|coin| coin.as_str() == raw && fits_callback_data(coin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str) -> CoinId {
        CoinId::new(id).unwrap()
    }

    #[test]
    fn test_exact_tags_win_over_prefix() {
        assert_eq!(CallbackAction::parse("price_single"), Some(CallbackAction::PriceSingle));
        assert_eq!(CallbackAction::parse("price_compare"), Some(CallbackAction::PriceCompare));
    }

    #[test]
    fn test_parse_dynamic_suffixes() {
        assert_eq!(
            CallbackAction::parse("price_bitcoin"),
            Some(CallbackAction::CoinPrice(coin("bitcoin")))
        );
        assert_eq!(
            CallbackAction::parse("compare_usd-coin"),
            Some(CallbackAction::CompareWith(coin("usd-coin")))
        );
    }

    #[test]
    fn test_unknown_and_invalid_data_ignored() {
        assert_eq!(CallbackAction::parse("settings"), None);
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("price_"), None);
        assert_eq!(CallbackAction::parse("price_Bitcoin"), None);
        assert_eq!(CallbackAction::parse("compare_shiba inu"), None);
    }

    #[test]
    fn test_data_round_trip_for_every_action() {
        let actions = [
            CallbackAction::CheckMembership,
            CallbackAction::PriceSingle,
            CallbackAction::PriceCompare,
            CallbackAction::PopularPrices,
            CallbackAction::Help,
            CallbackAction::BackToMenu,
            CallbackAction::SearchCoin,
            CallbackAction::CoinPrice(coin("solana")),
            CallbackAction::CompareWith(coin("polkadot")),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.to_data()), Some(action.clone()));
            assert!(action.to_data().len() <= 64);
        }
    }

    #[test]
    fn test_fits_callback_data() {
        assert!(fits_callback_data(&coin("matic-network")));
        assert!(!fits_callback_data(&coin("shiba inu")));
        assert!(!fits_callback_data(&coin(&"a".repeat(57))));
    }
}
