//! Persistence contracts, one repository per entity.
//!
//! `find` returns matches in insertion order. `save` inserts or replaces the
//! record with the same key.

mod filters;

pub use filters::{
    OrderFilter, PoolFilter, PositionFilter, ProjectFilter, RewardFilter, TokenFilter,
    WalletFilter,
};

use crate::error::RepositoryError;
use async_trait::async_trait;
use lpm_domain::{
    Order, OrderId, Pool, PoolKey, Position, PositionId, Project, ProjectId, Reward, RewardId,
    Token, Wallet,
};
use std::fmt::Debug;
use std::hash::Hash;

/// Attribute-set predicate. Empty attribute lists match anything.
pub trait RecordFilter<T>: Default + Send + Sync {
    /// True when `item` satisfies every attribute list.
    fn matches(&self, item: &T) -> bool;
}

/// A persistable entity.
pub trait Record: Clone + Send + Sync + 'static {
    /// Unique key; `save` replaces the record with an equal key.
    type Key: Eq + Hash + Clone + Debug + Send + Sync;
    /// Filter used by `find`.
    type Filter: RecordFilter<Self>;

    /// Key of this record.
    fn record_key(&self) -> Self::Key;
}

/// Store for one entity type.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// First record matching `filter`.
    async fn find_one(&self, filter: &T::Filter) -> Result<Option<T>, RepositoryError>;

    /// All records matching `filter`, in insertion order.
    async fn find(&self, filter: &T::Filter) -> Result<Vec<T>, RepositoryError>;

    /// Inserts `item` or replaces the record with the same key.
    async fn save(&self, item: &T) -> Result<(), RepositoryError>;

    /// Saves each item in order.
    async fn save_all(&self, items: &[T]) -> Result<(), RepositoryError> {
        for item in items {
            self.save(item).await?;
        }
        Ok(())
    }
}

/// Project store.
pub type ProjectRepository = dyn Repository<Project>;
/// Position store.
pub type PositionRepository = dyn Repository<Position>;
/// Order store.
pub type OrderRepository = dyn Repository<Order>;
/// Reward store.
pub type RewardRepository = dyn Repository<Reward>;
/// Pool store.
pub type PoolRepository = dyn Repository<Pool>;
/// Token store.
pub type TokenRepository = dyn Repository<Token>;
/// Wallet store.
pub type WalletRepository = dyn Repository<Wallet>;

impl Record for Project {
    type Key = ProjectId;
    type Filter = ProjectFilter;

    fn record_key(&self) -> ProjectId {
        self.id
    }
}

impl Record for Position {
    type Key = PositionId;
    type Filter = PositionFilter;

    fn record_key(&self) -> PositionId {
        self.id
    }
}

impl Record for Order {
    type Key = OrderId;
    type Filter = OrderFilter;

    fn record_key(&self) -> OrderId {
        self.id
    }
}

impl Record for Reward {
    type Key = RewardId;
    type Filter = RewardFilter;

    fn record_key(&self) -> RewardId {
        self.id
    }
}

impl Record for Pool {
    type Key = PoolKey;
    type Filter = PoolFilter;

    fn record_key(&self) -> PoolKey {
        self.key()
    }
}

impl Record for Token {
    type Key = (String, String);
    type Filter = TokenFilter;

    fn record_key(&self) -> (String, String) {
        (self.network.clone(), self.address.clone())
    }
}

impl Record for Wallet {
    type Key = (String, String);
    type Filter = WalletFilter;

    fn record_key(&self) -> (String, String) {
        (self.network.clone(), self.address.clone())
    }
}
