use crate::entities::pair::Pair;
use crate::entities::token::Token;
use crate::value_objects::{percentage::Percent, price::Price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lookup key for a pool: everything but its address and price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub network: String,
    pub protocol: String,
    pub base: Arc<Token>,
    pub quote: Arc<Token>,
    pub fee: Percent,
}

impl PoolKey {
    pub fn new(
        network: impl Into<String>,
        protocol: impl Into<String>,
        base: Arc<Token>,
        quote: Arc<Token>,
        fee: Percent,
    ) -> Self {
        Self {
            network: network.into(),
            protocol: protocol.into(),
            base,
            quote,
            fee,
        }
    }
}

/// A snapshot of a concentrated-liquidity pool. Refreshing the price yields
/// a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub network: String,
    pub protocol: String,
    pub address: String,
    pub fee: Percent,
    pub pair: Pair,
    pub last_price: Price,
}

impl Pool {
    /// 0.01%
    pub const LOWEST_FEE: Percent = Percent(Decimal::from_parts(1, 0, 0, false, 4));
    /// 0.05%
    pub const LOW_FEE: Percent = Percent(Decimal::from_parts(5, 0, 0, false, 4));
    /// 0.3%
    pub const MEDIUM_FEE: Percent = Percent(Decimal::from_parts(3, 0, 0, false, 3));
    /// 1%
    pub const HIGH_FEE: Percent = Percent(Decimal::from_parts(1, 0, 0, false, 2));

    pub const FEE_TIERS: [Percent; 4] = [
        Self::LOWEST_FEE,
        Self::LOW_FEE,
        Self::MEDIUM_FEE,
        Self::HIGH_FEE,
    ];

    pub fn new(
        network: impl Into<String>,
        protocol: impl Into<String>,
        address: impl Into<String>,
        fee: Percent,
        pair: Pair,
        last_price: Price,
    ) -> Self {
        Self {
            network: network.into(),
            protocol: protocol.into(),
            address: address.into(),
            fee,
            pair,
            last_price,
        }
    }

    pub fn key(&self) -> PoolKey {
        PoolKey::new(
            self.network.clone(),
            self.protocol.clone(),
            Arc::clone(&self.pair.base),
            Arc::clone(&self.pair.quote),
            self.fee,
        )
    }

    pub fn matches(&self, key: &PoolKey) -> bool {
        self.network == key.network
            && self.protocol == key.protocol
            && self.fee == key.fee
            && self.pair.base == key.base
            && self.pair.quote == key.quote
    }

    pub fn with_last_price(&self, price: Price) -> Pool {
        Pool {
            last_price: price,
            ..self.clone()
        }
    }

    pub fn base_token(&self) -> &Arc<Token> {
        &self.pair.base
    }

    pub fn quote_token(&self) -> &Arc<Token> {
        &self.pair.quote
    }

    /// `[network] protocol: BASE/QUOTE fee`
    pub fn name(&self) -> String {
        format!(
            "[{}] {}: {} {}",
            self.network, self.protocol, self.pair, self.fee
        )
    }
}
