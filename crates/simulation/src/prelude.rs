//! Prelude module for convenient imports.
//!
//! ```rust
//! use lpm_simulation::prelude::*;
//! ```

// Addresses
pub use crate::address::derive_address;

// Errors
pub use crate::error::SimulationError;

// Liquidity models
pub use crate::liquidity::{ConstantLiquidity, LiquidityModel};

// Market
pub use crate::market::{
    LIQUIDITY_SCALE, MarketConfig, PaperMarket, PoolListing, PoolTick, scaled_liquidity,
};

// Price path generators
pub use crate::price_path::{DeterministicPricePath, GeometricBrownianMotion, PricePathGenerator};

// Scenarios
pub use crate::scenario::{EthUsdc, PAPER_NETWORK, PAPER_PROTOCOL};

// Sessions
pub use crate::session::{PaperSession, SessionTotals, StepReport};

// Volume models
pub use crate::volume::{ConstantVolume, VolumeModel};
