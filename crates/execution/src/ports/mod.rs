//! Collaborator contracts consumed by the decision engine.
//!
//! Adapters (DEX integrations, wallets, the paper market) implement these
//! traits. Failures are reported as `anyhow::Error` and wrapped with call-site
//! context by the managers.

mod balance;
mod factory;
mod liquidity;
mod router;

pub use balance::{BalanceProvider, WalletAddressGenerator};
pub use factory::{AmountsRequest, PoolFactory, PoolState, RangeRequest, SizedAmounts};
pub use liquidity::{
    DecreaseLiquidityReceipt, DecreaseLiquidityRequest, IncreaseLiquidityReceipt,
    IncreaseLiquidityRequest, LiquidityManager, LivePosition, PositionQuery,
};
pub use router::{Router, SwapFill, SwapRequest};
