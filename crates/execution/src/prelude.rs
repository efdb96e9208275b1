//! Prelude module for convenient imports.
//!
//! ```rust
//! use lpm_execution::prelude::*;
//! ```

// Config
pub use crate::config::{ConfigError, RunnerConfig};

// Emergency
pub use crate::emergency::{BreakerConfig, BreakerState, BreakerStats, ProjectBreaker};

// Errors
pub use crate::error::{ExecutionError, RepositoryError};

// Lifecycle
pub use crate::lifecycle::{
    AggregateStats, EventData, LifecycleEvent, LifecycleEventType, LifecycleTracker,
    ProjectSummary,
};

// Managers
pub use crate::managers::{
    NewOrder, NewProject, NewWallet, OpenPosition, OrderManager, PoolManager, PositionManager,
    ProjectManager, RewardManager, WalletManager,
};

// Ports
pub use crate::ports::{
    AmountsRequest, BalanceProvider, DecreaseLiquidityReceipt, DecreaseLiquidityRequest,
    IncreaseLiquidityReceipt, IncreaseLiquidityRequest, LiquidityManager, LivePosition,
    PoolFactory, PoolState, PositionQuery, RangeRequest, Router, SizedAmounts, SwapFill,
    SwapRequest, WalletAddressGenerator,
};

// Repositories
pub use crate::repository::{
    OrderFilter, OrderRepository, PoolFilter, PoolRepository, PositionFilter, PositionRepository,
    ProjectFilter, ProjectRepository, Record, RecordFilter, Repository, RewardFilter,
    RewardRepository, TokenFilter, TokenRepository, WalletFilter, WalletRepository,
};

// Runner
pub use crate::runner::{CycleReport, ProjectReport, ProjectRunner};

// Strategy
pub use crate::strategy::{
    CycleOutcome, Feasibility, ProjectExecutor, SizingReport, SwapPlan, can_be_opened,
    position_worth, provisional_amounts,
};
