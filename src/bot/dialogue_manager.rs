//! Dialogue Manager module for handling dialogue state transitions
//!
//! The functions here decide what a piece of text means in the current
//! session state and which state follows. They never talk to Telegram, so
//! the message handler stays a thin send/update layer.

use tracing::{debug, info};

use crate::coin::{displayable_price, CoinId};
use crate::dialogue::{is_cancel, parse_compare_input, PriceComparison, SessionState};
use crate::price_client::PriceSource;

/// Where a plain text message (one that is not a known command) goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRoute {
    /// Cancel command in another casing, outside the compare dialogue
    Cancel,
    /// Input for the compare dialogue, including its cancel command
    Compare,
    /// One-shot coin search
    Search,
    /// Dropped; the session state is left untouched
    Ignore,
}

/// Route plain text by session state
///
/// The compare dialogue takes priority over the search. Any other `/` text
/// is an unknown command and never counts as coin input. Text arriving
/// while awaiting a "compare with" coin has no consumer.
pub fn route_text(state: &SessionState, text: &str) -> TextRoute {
    if is_cancel(text) {
        return match state {
            SessionState::Comparing => TextRoute::Compare,
            _ => TextRoute::Cancel,
        };
    }
    if text.trim_start().starts_with('/') {
        return TextRoute::Ignore;
    }
    match state {
        SessionState::Comparing => TextRoute::Compare,
        SessionState::AwaitingCoinSearch => TextRoute::Search,
        SessionState::AwaitingCompareCoin { .. } | SessionState::Idle => TextRoute::Ignore,
    }
}

/// Outcome of one message inside the compare dialogue
#[derive(Clone, Debug, PartialEq)]
pub enum CompareStep {
    /// `/cancel`: leave the dialogue without computing anything
    Cancelled,
    /// Fewer than two coins given; no price was fetched
    NeedTwoCoins,
    /// At least one coin had no price
    Unavailable { missing: Vec<CoinId> },
    /// Both prices resolved
    Compared(PriceComparison),
}

impl CompareStep {
    /// Session state after this step
    pub fn next_state(&self) -> SessionState {
        match self {
            CompareStep::Cancelled | CompareStep::Compared(_) => SessionState::Idle,
            CompareStep::NeedTwoCoins | CompareStep::Unavailable { .. } => SessionState::Comparing,
        }
    }
}

/// Decide whether compare input can be priced at all
///
/// Split from [`run_comparison`] so the handler can show a "fetching"
/// notice between validation and the price lookups.
pub fn plan_comparison(text: &str) -> Result<(CoinId, CoinId), CompareStep> {
    if is_cancel(text) {
        return Err(CompareStep::Cancelled);
    }
    parse_compare_input(text).map_err(|_| CompareStep::NeedTwoCoins)
}

/// Fetch both prices, one request each, and build the step result
pub async fn run_comparison(first: CoinId, second: CoinId, prices: &dyn PriceSource) -> CompareStep {
    let first_price = prices.usd_price(&first).await;
    let second_price = prices.usd_price(&second).await;

    match (first_price, second_price) {
        (Some(first_price), Some(second_price)) => {
            let comparison = PriceComparison {
                first,
                first_price,
                second,
                second_price,
            };
            info!(
                first = %comparison.first,
                second = %comparison.second,
                ratio = comparison.ratio(),
                "Compared coin prices"
            );
            CompareStep::Compared(comparison)
        }
        (first_price, second_price) => {
            let mut missing = Vec::new();
            if first_price.is_none() {
                missing.push(first);
            }
            if second_price.is_none() {
                missing.push(second);
            }
            debug!(missing = ?missing, "Comparison failed, staying in compare mode");
            CompareStep::Unavailable { missing }
        }
    }
}

/// Handle one message while the user is comparing
pub async fn handle_compare_text(text: &str, prices: &dyn PriceSource) -> CompareStep {
    match plan_comparison(text) {
        Ok((first, second)) => run_comparison(first, second, prices).await,
        Err(step) => step,
    }
}

/// Outcome of a free-text coin search
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found { coin: CoinId, price: f64 },
    NotFound { coin: CoinId },
    /// Blank input, nothing was looked up
    Empty,
}

impl SearchOutcome {
    /// A search is a single attempt: the session always returns to idle
    pub fn next_state(&self) -> SessionState {
        SessionState::Idle
    }
}

/// Look up free-text input as a coin id
pub async fn handle_search_text(text: &str, prices: &dyn PriceSource) -> SearchOutcome {
    let Some(coin) = CoinId::new(text) else {
        return SearchOutcome::Empty;
    };

    match displayable_price(prices.usd_price(&coin).await) {
        Some(price) => SearchOutcome::Found { coin, price },
        None => SearchOutcome::NotFound { coin },
    }
}
