//! Generic in-memory repository.

use async_trait::async_trait;
use lpm_execution::error::RepositoryError;
use lpm_execution::repository::{Record, RecordFilter, Repository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::trace;

struct Table<T: Record> {
    rows: Vec<T>,
    index: HashMap<T::Key, usize>,
}

impl<T: Record> Table<T> {
    /// Replaces the row stored under `item`'s key, or appends it. Returns
    /// true when a row was replaced.
    fn upsert(&mut self, item: &T) -> bool {
        let key = item.record_key();
        match self.index.get(&key).copied() {
            Some(slot) => {
                self.rows[slot] = item.clone();
                true
            }
            None => {
                self.index.insert(key, self.rows.len());
                self.rows.push(item.clone());
                false
            }
        }
    }
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// Keeps records in insertion order. Saving a record whose key is already
/// stored replaces it in place.
pub struct MemoryRepository<T: Record> {
    table: RwLock<Table<T>>,
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }
}

impl<T: Record> MemoryRepository<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn find_one(&self, filter: &T::Filter) -> Result<Option<T>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|row| filter.matches(row)).cloned())
    }

    async fn find(&self, filter: &T::Filter) -> Result<Vec<T>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    async fn save(&self, item: &T) -> Result<(), RepositoryError> {
        let replaced = self.table.write().await.upsert(item);
        trace!(key = ?item.record_key(), replaced, "Record saved");
        Ok(())
    }

    async fn save_all(&self, items: &[T]) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        let mut replaced = 0;
        for item in items {
            if table.upsert(item) {
                replaced += 1;
            }
        }
        trace!(count = items.len(), replaced, "Records saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpm_domain::{
        Amount, InactiveReason, Pair, Percent, Pool, Price, Project, ProjectStatus, Token, Wallet,
    };
    use lpm_execution::repository::{PoolFilter, ProjectFilter, TokenFilter};
    use primitive_types::U256;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn base() -> Arc<Token> {
        Arc::new(Token::new("ethereum", "0xweth", "WETH", 18))
    }

    fn quote() -> Arc<Token> {
        Arc::new(Token::new("ethereum", "0xusdc", "USDC", 6))
    }

    fn pool(fee: Percent) -> Pool {
        Pool::new(
            "ethereum",
            "uniswap-v3",
            "0xpool",
            fee,
            Pair::new(base(), quote()),
            Price::new(dec!(2000)),
        )
    }

    fn project() -> Project {
        let native = base();
        Project::new(
            Wallet::new("main", "ethereum", "0xwallet", "key", native),
            pool(Pool::MEDIUM_FEE),
            "eth-usdc",
            Amount::new(quote(), U256::from(1_000_000_000u64)),
            Percent::new(dec!(0.2)),
            Percent::new(dec!(0.1)),
            Percent::new(dec!(0.05)),
            Percent::new(dec!(0.01)),
            1,
        )
    }

    #[tokio::test]
    async fn test_save_replaces_by_key_in_place() {
        let repo = MemoryRepository::<Project>::new();
        let mut first = project();
        let second = project();

        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();
        first.deactivate(InactiveReason::StopLoss);
        repo.save(&first).await.unwrap();

        assert_eq!(repo.len().await, 2);
        let all = repo.find(&ProjectFilter::default()).await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].status(), ProjectStatus::Inactive);
        assert_eq!(all[1].id, second.id);
    }

    #[tokio::test]
    async fn test_filters_select_matching_records() {
        let repo = MemoryRepository::<Project>::new();
        let mut inactive = project();
        inactive.deactivate(InactiveReason::NotEnoughGas);
        let active = project();
        repo.save_all(&[inactive.clone(), active.clone()])
            .await
            .unwrap();

        let found = repo.find(&ProjectFilter::active()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, active.id);

        let one = repo
            .find_one(&ProjectFilter::by_id(inactive.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(one.inactive_reason(), Some(InactiveReason::NotEnoughGas));
    }

    #[tokio::test]
    async fn test_pool_identity_includes_fee_tier() {
        let repo = MemoryRepository::<Pool>::new();
        repo.save(&pool(Pool::MEDIUM_FEE)).await.unwrap();
        repo.save(&pool(Pool::LOW_FEE)).await.unwrap();
        repo.save(&pool(Pool::MEDIUM_FEE).with_last_price(Price::new(dec!(2100))))
            .await
            .unwrap();

        assert_eq!(repo.len().await, 2);
        let medium = repo
            .find_one(&PoolFilter {
                fees: vec![Pool::MEDIUM_FEE],
                ..Default::default()
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(medium.last_price, Price::new(dec!(2100)));
    }

    #[tokio::test]
    async fn test_empty_repository_finds_nothing() {
        let repo = MemoryRepository::<Token>::new();
        assert!(repo.is_empty().await);
        assert!(
            repo.find_one(&TokenFilter::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_save_all_upserts_like_save() {
        let repo = MemoryRepository::<Project>::new();
        let mut first = project();
        let second = project();
        repo.save(&first).await.unwrap();

        first.deactivate(InactiveReason::StopLoss);
        repo.save_all(&[second.clone(), first.clone(), second.clone()])
            .await
            .unwrap();

        assert_eq!(repo.len().await, 2);
        let all = repo.find(&ProjectFilter::default()).await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].inactive_reason(), Some(InactiveReason::StopLoss));
        assert_eq!(all[1].id, second.id);
    }
}
