use async_trait::async_trait;
use lpm_domain::{Amount, Percent, PoolKey, PositionRange, Price};

/// Live state of a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolState {
    /// Pool address.
    pub address: String,
    /// Latest price of base in quote.
    pub last_price: Price,
    /// Active liquidity in the pool.
    pub liquidity: u128,
}

/// Range to compute around the current price.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRequest {
    /// Network of the pool.
    pub network: String,
    /// Protocol of the pool.
    pub protocol: String,
    /// Pool to compute the range for.
    pub pool_address: String,
    /// Downside width as a fraction of the price.
    pub base_volatility: Percent,
    /// Upside width as a fraction of the price.
    pub quote_volatility: Percent,
}

/// Amounts to fit into a range.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountsRequest {
    /// Range the position would use.
    pub range: PositionRange,
    /// Base amount available.
    pub base: Amount,
    /// Quote amount available.
    pub quote: Amount,
}

/// Amounts a position can actually take at the pool's current state.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedAmounts {
    /// Liquidity the amounts provide.
    pub liquidity: u128,
    /// Base amount needed.
    pub base: Amount,
    /// Quote amount needed.
    pub quote: Amount,
}

/// Pool discovery and range arithmetic.
#[async_trait]
pub trait PoolFactory: Send + Sync {
    /// Discovers the pool for a key.
    async fn find_pool(&self, key: &PoolKey) -> anyhow::Result<PoolState>;

    /// Fetches the live state of a known pool.
    async fn get_pool(
        &self,
        network: &str,
        protocol: &str,
        address: &str,
    ) -> anyhow::Result<PoolState>;

    /// Computes a price range around the current price. Implementations
    /// must return `lower <= initial <= upper`.
    async fn calculate_range(&self, request: &RangeRequest) -> anyhow::Result<PositionRange>;

    /// Fits the available amounts to a range.
    async fn calculate_amounts(&self, request: &AmountsRequest) -> anyhow::Result<SizedAmounts>;
}
