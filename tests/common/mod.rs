//! Shared stubs for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use teloxide::types::UserId;

use coin_price_bot::coin::CoinId;
use coin_price_bot::membership::{MemberStatus, MembershipSource};
use coin_price_bot::price_client::PriceSource;

/// Price source answering from a fixed table and counting lookups
#[derive(Default)]
pub struct StaticPrices {
    prices: HashMap<String, f64>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StaticPrices {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(id, p)| (id.to_string(), *p)).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for StaticPrices {
    async fn usd_price(&self, coin: &CoinId) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(coin.to_string());
        self.prices.get(coin.as_str()).copied()
    }
}

/// Membership source with a canned answer
pub enum StubMembership {
    Status(MemberStatus),
    Failing,
}

#[async_trait]
impl MembershipSource for StubMembership {
    async fn member_status(&self, _user_id: UserId) -> anyhow::Result<MemberStatus> {
        match self {
            StubMembership::Status(status) => Ok(*status),
            StubMembership::Failing => Err(anyhow::anyhow!("Bad Request: chat not found")),
        }
    }
}

pub fn coin(id: &str) -> CoinId {
    CoinId::new(id).unwrap()
}
