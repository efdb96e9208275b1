use async_trait::async_trait;
use lpm_domain::{Amount, Pair, Percent, PositionRange, PositionState};
use primitive_types::U256;

/// Deposit into a new position.
#[derive(Debug, Clone, PartialEq)]
pub struct IncreaseLiquidityRequest {
    /// Network of the pool.
    pub network: String,
    /// Protocol of the pool.
    pub protocol: String,
    /// Pool holding the position.
    pub pool_address: String,
    /// Fee tier of the pool.
    pub fee: Percent,
    /// Token pair of the pool.
    pub pair: Pair,
    /// Wallet address providing the funds.
    pub owner: String,
    /// Range to provide liquidity in.
    pub range: PositionRange,
    /// Base amount to deposit.
    pub base: Amount,
    /// Quote amount to deposit.
    pub quote: Amount,
}

/// What a deposit actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct IncreaseLiquidityReceipt {
    /// Address of the new position.
    pub address: String,
    /// Liquidity minted.
    pub liquidity: u128,
    /// Base amount actually deposited.
    pub base: Amount,
    /// Quote amount actually deposited.
    pub quote: Amount,
    /// Paid in the wallet's native token, base units.
    pub transaction_fee: U256,
}

/// Withdrawal from an existing position.
#[derive(Debug, Clone, PartialEq)]
pub struct DecreaseLiquidityRequest {
    /// Network of the pool.
    pub network: String,
    /// Protocol of the pool.
    pub protocol: String,
    /// Pool holding the position.
    pub pool_address: String,
    /// Fee tier of the pool.
    pub fee: Percent,
    /// Token pair of the pool.
    pub pair: Pair,
    /// Wallet address receiving the funds.
    pub owner: String,
    /// Position to withdraw from.
    pub position_address: String,
    /// Liquidity to burn.
    pub liquidity: u128,
    /// Cap on withdrawn base principal.
    pub base_max: Amount,
    /// Cap on withdrawn quote principal.
    pub quote_max: Amount,
}

/// What a withdrawal actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct DecreaseLiquidityReceipt {
    /// Transaction address.
    pub address: String,
    /// Liquidity burned.
    pub liquidity: u128,
    /// Base amount received, fees included.
    pub base: Amount,
    /// Quote amount received, fees included.
    pub quote: Amount,
    /// Paid in the wallet's native token, base units.
    pub transaction_fee: U256,
}

/// Lookup of one position on the venue.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionQuery {
    /// Network of the pool.
    pub network: String,
    /// Protocol of the pool.
    pub protocol: String,
    /// Pool holding the position.
    pub pool_address: String,
    /// Fee tier of the pool.
    pub fee: Percent,
    /// Token pair of the pool.
    pub pair: Pair,
    /// Position to look up.
    pub position_address: String,
}

/// Venue view of a position.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePosition {
    /// Liquidity still in the position.
    pub liquidity: u128,
    /// Current amounts and price.
    pub state: PositionState,
}

/// Venue that holds liquidity positions.
#[async_trait]
pub trait LiquidityManager: Send + Sync {
    /// Opens a position with the requested amounts.
    async fn increase_liquidity(
        &self,
        request: &IncreaseLiquidityRequest,
    ) -> anyhow::Result<IncreaseLiquidityReceipt>;

    /// Withdraws liquidity. The withdrawn principal never exceeds the
    /// per-side caps; fees accrued by the position are paid on top.
    async fn decrease_liquidity(
        &self,
        request: &DecreaseLiquidityRequest,
    ) -> anyhow::Result<DecreaseLiquidityReceipt>;

    /// Current view of a position.
    async fn get_position(&self, query: &PositionQuery) -> anyhow::Result<LivePosition>;
}
