//! Paper-trading market.
//!
//! Implements every collaborator contract of the execution engine against
//! simulated pools: prices follow a [`PricePathGenerator`], positions use
//! concentrated-liquidity math, swaps fill at the pool price plus the pool
//! fee, and every transaction debits gas from the owner's native balance.
//!
//! [`PricePathGenerator`]: crate::price_path::PricePathGenerator

mod book;
mod ports;

pub use book::{LIQUIDITY_SCALE, PoolListing, scaled_liquidity};

use crate::address::derive_address;
use crate::error::SimulationError;
use book::{Ledger, PaperPosition};
use lpm_domain::{Amount, Pool, Price, Token};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Gas charged per transaction, in human units of the network's native
    /// token.
    pub gas_per_transaction: Decimal,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            gas_per_transaction: Decimal::new(5, 4), // 0.0005
        }
    }
}

/// Price of one pool after a market step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolTick {
    pub pool: String,
    pub price: Price,
    /// Open positions that earned fees this step.
    pub positions_in_range: usize,
}

#[derive(Default)]
struct MarketState {
    pools: Vec<PoolListing>,
    positions: HashMap<String, PaperPosition>,
    natives: HashMap<String, Arc<Token>>,
    ledger: Ledger,
    sequence: u64,
}

impl MarketState {
    fn pool(&self, network: &str, address: &str) -> Result<&PoolListing, SimulationError> {
        self.pools
            .iter()
            .find(|l| l.pool.network == network && l.pool.address == address)
            .ok_or_else(|| SimulationError::UnknownPool(format!("{network}:{address}")))
    }

    fn native(&self, network: &str) -> Result<&Arc<Token>, SimulationError> {
        self.natives
            .get(network)
            .ok_or_else(|| SimulationError::UnknownNetwork(network.to_string()))
    }

    /// Gas for one transaction on `network`.
    fn gas(&self, network: &str, per_transaction: Decimal) -> Result<Amount, SimulationError> {
        let native = self.native(network)?;
        Ok(Amount::from_human(Arc::clone(native), per_transaction)?)
    }

    fn next_address(&mut self, namespace: &str) -> String {
        self.sequence += 1;
        derive_address(namespace, &self.sequence.to_string())
    }
}

pub struct PaperMarket {
    config: MarketConfig,
    state: RwLock<MarketState>,
}

impl PaperMarket {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            config,
            state: RwLock::new(MarketState::default()),
        }
    }

    /// Registers the token gas is paid in on `token.network`.
    pub async fn register_native(&self, token: Arc<Token>) {
        let mut state = self.state.write().await;
        state.natives.insert(token.network.clone(), token);
    }

    pub async fn list_pool(&self, listing: PoolListing) {
        info!(pool = %listing.pool.name(), price = %listing.price(), "Pool listed");
        let mut state = self.state.write().await;
        state.pools.retain(|l| l.pool.key() != listing.pool.key());
        state.pools.push(listing);
    }

    /// Credits `amount` to the wallet at `owner`.
    pub async fn deposit(&self, owner: &str, amount: &Amount) -> Result<(), SimulationError> {
        debug!(owner = owner, amount = %amount, "Deposit");
        self.state.write().await.ledger.credit(owner, amount)
    }

    pub async fn balance_of(&self, owner: &str, token: &Arc<Token>) -> Amount {
        self.state.read().await.ledger.balance(owner, token)
    }

    pub async fn pool(&self, network: &str, address: &str) -> Option<Pool> {
        let state = self.state.read().await;
        state.pool(network, address).ok().map(|l| l.pool.clone())
    }

    pub async fn open_positions(&self) -> usize {
        let state = self.state.read().await;
        state.positions.values().filter(|p| p.open).count()
    }

    /// Moves every pool one step along its price path and accrues fees to
    /// open positions whose range contains the new price.
    ///
    /// A position earns `volume × fee × L / (L + external liquidity)`,
    /// half in each token.
    pub async fn advance(&self) -> Result<Vec<PoolTick>, SimulationError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let mut ticks = Vec::with_capacity(state.pools.len());

        for listing in &mut state.pools {
            let next = listing.path.next_price(listing.price());
            listing.pool = listing.pool.with_last_price(next);
            let volume = listing.volume.next_volume();
            let external = listing.external_liquidity();
            let fee = listing.pool.fee.value();

            let mut positions_in_range = 0;
            for position in state.positions.values_mut() {
                if !position.open
                    || position.pool_address != listing.pool.address
                    || !position.in_range(next)
                {
                    continue;
                }
                positions_in_range += 1;

                let total = position.liquidity + external;
                if total.is_zero() || next.value.is_zero() {
                    continue;
                }
                let share = position.liquidity / total;
                let earned = volume
                    .checked_mul(fee)
                    .and_then(|v| v.checked_mul(share))
                    .ok_or(SimulationError::Math("fee overflow"))?;
                let half = earned / Decimal::TWO;
                position.quote_fees += half;
                position.base_fees += half / next.value;
            }

            debug!(
                pool = %listing.pool.address,
                price = %next,
                positions_in_range,
                "Market step"
            );
            ticks.push(PoolTick {
                pool: listing.pool.address.clone(),
                price: next,
                positions_in_range,
            });
        }

        Ok(ticks)
    }
}

impl Default for PaperMarket {
    fn default() -> Self {
        Self::new(MarketConfig::default())
    }
}
