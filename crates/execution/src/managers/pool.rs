use crate::error::{CollaboratorResultExt, ExecutionError, RepositoryResultExt};
use crate::ports::{AmountsRequest, PoolFactory, RangeRequest, SizedAmounts};
use crate::repository::{PoolFilter, PoolRepository};
use lpm_domain::{Amount, Pair, Percent, Pool, PoolKey, PositionRange};
use std::sync::Arc;

/// Pool discovery, range computation and position sizing.
pub struct PoolManager {
    repo: Arc<PoolRepository>,
    factory: Arc<dyn PoolFactory>,
}

impl PoolManager {
    /// Creates a manager over the pool store and factory.
    pub fn new(repo: Arc<PoolRepository>, factory: Arc<dyn PoolFactory>) -> Self {
        Self { repo, factory }
    }

    /// Returns the pool for `(network, protocol, pair, fee)` with a fresh
    /// price. A stored pool is refreshed from the factory; an unknown one is
    /// discovered and stored.
    pub async fn get(
        &self,
        network: &str,
        protocol: &str,
        pair: &Pair,
        fee: Percent,
    ) -> Result<Pool, ExecutionError> {
        let filter = PoolFilter {
            networks: vec![network.to_string()],
            protocols: vec![protocol.to_string()],
            base_tokens: vec![pair.base.as_ref().clone()],
            quote_tokens: vec![pair.quote.as_ref().clone()],
            fees: vec![fee],
            ..Default::default()
        };

        let pool = match self.repo.find_one(&filter).await.storage("find a pool in repo")? {
            Some(stored) => {
                let state = self
                    .factory
                    .get_pool(&stored.network, &stored.protocol, &stored.address)
                    .await
                    .collaborator("factory: get pool")?;
                stored.with_last_price(state.last_price)
            }
            None => {
                let key = PoolKey::new(
                    network,
                    protocol,
                    Arc::clone(&pair.base),
                    Arc::clone(&pair.quote),
                    fee,
                );
                let state = self
                    .factory
                    .find_pool(&key)
                    .await
                    .collaborator("factory: find pool")?;
                Pool::new(network, protocol, state.address, fee, pair.clone(), state.last_price)
            }
        };

        self.repo.save(&pool).await.storage("save pool")?;
        Ok(pool)
    }

    /// Computes a range around the current price, using `volatility` for
    /// both sides. Returns the range and the pool refreshed to the range's
    /// initial price; the refreshed pool is persisted.
    pub async fn calculate_position_range(
        &self,
        pool: &Pool,
        volatility: Percent,
    ) -> Result<(PositionRange, Pool), ExecutionError> {
        let range = self
            .factory
            .calculate_range(&RangeRequest {
                network: pool.network.clone(),
                protocol: pool.protocol.clone(),
                pool_address: pool.address.clone(),
                base_volatility: volatility,
                quote_volatility: volatility,
            })
            .await
            .collaborator("factory: calculate range")?;

        let refreshed = pool.with_last_price(range.initial_price);
        self.repo
            .save(&refreshed)
            .await
            .storage("save pool after range calculation")?;
        Ok((range, refreshed))
    }

    /// Fits the provisional amounts to `range` and returns the
    /// liquidity with the amounts actually needed.
    pub async fn calculate_position_amounts(
        &self,
        range: PositionRange,
        base: Amount,
        quote: Amount,
    ) -> Result<SizedAmounts, ExecutionError> {
        self.factory
            .calculate_amounts(&AmountsRequest { range, base, quote })
            .await
            .collaborator("factory: calculate amounts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use crate::testing::{StubMarket, VecRepository, base, price, quote};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_unknown_pool_is_discovered_then_refreshed() {
        let market = Arc::new(StubMarket::new(dec!(100), dec!(90), dec!(110)));
        let repo = Arc::new(VecRepository::<Pool>::new());
        let manager = PoolManager::new(repo.clone(), market.clone());
        let pair = Pair::new(base(), quote());

        let discovered = manager
            .get("testnet", "stub-v3", &pair, Pool::MEDIUM_FEE)
            .await
            .unwrap();
        assert_eq!(discovered.address, "0xpool");
        assert_eq!(discovered.last_price, price(dec!(100)));

        *market.price.lock().unwrap() = price(dec!(105));
        let refreshed = manager
            .get("testnet", "stub-v3", &pair, Pool::MEDIUM_FEE)
            .await
            .unwrap();
        assert_eq!(refreshed.last_price, price(dec!(105)));
        assert_eq!(*market.factory_calls.lock().unwrap(), vec!["find_pool", "get_pool"]);

        let stored = repo.find(&PoolFilter::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].last_price, price(dec!(105)));
    }

    #[tokio::test]
    async fn test_other_fee_tier_is_a_different_pool() {
        let market = Arc::new(StubMarket::new(dec!(100), dec!(90), dec!(110)));
        let repo = Arc::new(VecRepository::<Pool>::new());
        let manager = PoolManager::new(repo.clone(), market.clone());
        let pair = Pair::new(base(), quote());

        manager
            .get("testnet", "stub-v3", &pair, Pool::MEDIUM_FEE)
            .await
            .unwrap();
        manager
            .get("testnet", "stub-v3", &pair, Pool::LOW_FEE)
            .await
            .unwrap();

        assert_eq!(*market.factory_calls.lock().unwrap(), vec!["find_pool", "find_pool"]);
        assert_eq!(repo.find(&PoolFilter::default()).await.unwrap().len(), 2);
    }
}
