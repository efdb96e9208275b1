use async_trait::async_trait;
use lpm_domain::{Amount, Percent, Price};
use primitive_types::U256;

/// Exact-output swap on one pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    /// Network of the pool.
    pub network: String,
    /// Protocol of the pool.
    pub protocol: String,
    /// Pool to swap on.
    pub pool_address: String,
    /// Fee tier of the pool.
    pub fee: Percent,
    /// Wallet address that pays and receives.
    pub owner: String,
    /// Maximum the wallet is willing to pay.
    pub amount_in: Amount,
    /// Exact amount wanted.
    pub amount_out: Amount,
}

/// What a swap actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapFill {
    /// Transaction or order address.
    pub address: String,
    /// Amount paid.
    pub amount_in: Amount,
    /// Amount received.
    pub amount_out: Amount,
    /// Price the swap filled at.
    pub filled_price: Price,
    /// Fee paid in native token base units.
    pub transaction_fee: U256,
}

/// Swap venue.
#[async_trait]
pub trait Router: Send + Sync {
    async fn swap(&self, request: &SwapRequest) -> anyhow::Result<SwapFill>;
}
