//! Domain model for the liquidity position manager.
//!
//! Tokens, pools and the fixed-point [`Amount`] they are measured in, plus
//! the strategy aggregates (projects, positions, orders, rewards, wallets)
//! that the execution engine mutates.

/// Strategy and position entities.
pub mod entities;
/// Enumerations shared across entities.
pub mod enums;
/// Domain errors.
pub mod error;
/// Concentrated-liquidity math.
pub mod math;
/// Value objects.
pub mod value_objects;

pub use entities::{
    Order, OrderId, Pair, Pool, PoolKey, Position, PositionId, PositionState, Project, ProjectId,
    Reward, RewardId, Token, Wallet,
};
pub use enums::{InactiveReason, OrderDirection, PairSide, PositionStatus, ProjectStatus};
pub use error::{AmountError, EntityError};
pub use value_objects::{Amount, Operand, Percent, PositionRange, Price};
