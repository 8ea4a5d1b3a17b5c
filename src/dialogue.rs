//! Per-user session state and the compare dialogue's pure logic.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::coin::CoinId;

/// Cancel command, matched in any casing when typed as plain text
pub const CANCEL_TEXT: &str = "/cancel";

/// Represents the conversation mode of a single user
///
/// Exactly one mode is active at a time; entering a mode replaces the
/// previous one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    /// The next plain text message is looked up as a coin id
    AwaitingCoinSearch,
    /// A second coin was requested after "compare with"; no handler consumes
    /// this state yet, text arriving in it is ignored
    AwaitingCompareCoin { base: CoinId },
    /// Waiting for two space separated coin ids
    Comparing,
}

/// Type alias for our session dialogue
pub type SessionDialogue = Dialogue<SessionState, InMemStorage<SessionState>>;

/// Why compare input was rejected before any price lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompareInputError {
    /// Fewer than two whitespace separated tokens
    TooFewCoins,
}

/// Split compare input into two coin ids; tokens past the second are dropped
pub fn parse_compare_input(text: &str) -> Result<(CoinId, CoinId), CompareInputError> {
    let mut tokens = text.split_whitespace().filter_map(CoinId::new);
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(CompareInputError::TooFewCoins),
    }
}

/// Whether the text is the literal cancel command
pub fn is_cancel(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(CANCEL_TEXT)
}

/// Two resolved prices and their ratio
#[derive(Clone, Debug, PartialEq)]
pub struct PriceComparison {
    pub first: CoinId,
    pub first_price: f64,
    pub second: CoinId,
    pub second_price: f64,
}

impl PriceComparison {
    /// How many `second` one `first` is worth; 0 when the second price is 0
    pub fn ratio(&self) -> f64 {
        if self.second_price == 0.0 {
            0.0
        } else {
            self.first_price / self.second_price
        }
    }

    /// How many `first` one `second` is worth; 0 when the ratio is 0
    pub fn reciprocal(&self) -> f64 {
        let ratio = self.ratio();
        if ratio == 0.0 {
            0.0
        } else {
            1.0 / ratio
        }
    }
}
