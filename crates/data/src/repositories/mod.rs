//! Repository implementations backed by process memory.

mod memory_repository;

pub use memory_repository::MemoryRepository;

use lpm_domain::{Order, Pool, Position, Project, Reward, Token, Wallet};
use lpm_execution::repository::{
    OrderRepository, PoolRepository, PositionRepository, ProjectRepository, RewardRepository,
    TokenRepository, WalletRepository,
};
use std::sync::Arc;

/// One repository per entity, shared by everything built from this store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    projects: Arc<MemoryRepository<Project>>,
    positions: Arc<MemoryRepository<Position>>,
    orders: Arc<MemoryRepository<Order>>,
    rewards: Arc<MemoryRepository<Reward>>,
    pools: Arc<MemoryRepository<Pool>>,
    tokens: Arc<MemoryRepository<Token>>,
    wallets: Arc<MemoryRepository<Wallet>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn projects(&self) -> Arc<ProjectRepository> {
        self.projects.clone()
    }

    #[must_use]
    pub fn positions(&self) -> Arc<PositionRepository> {
        self.positions.clone()
    }

    #[must_use]
    pub fn orders(&self) -> Arc<OrderRepository> {
        self.orders.clone()
    }

    #[must_use]
    pub fn rewards(&self) -> Arc<RewardRepository> {
        self.rewards.clone()
    }

    #[must_use]
    pub fn pools(&self) -> Arc<PoolRepository> {
        self.pools.clone()
    }

    #[must_use]
    pub fn tokens(&self) -> Arc<TokenRepository> {
        self.tokens.clone()
    }

    #[must_use]
    pub fn wallets(&self) -> Arc<WalletRepository> {
        self.wallets.clone()
    }
}
