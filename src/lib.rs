//! # Coin Price Bot
//!
//! A Telegram bot that relays cryptocurrency spot prices from CoinGecko to
//! members of a required channel, with a small menu system, a free-text
//! coin search and a two-step "compare two coins" dialogue.

pub mod bot;
pub mod coin;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod membership;
pub mod price_client;
