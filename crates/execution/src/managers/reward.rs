use crate::error::{ExecutionError, RepositoryResultExt};
use crate::repository::{RewardFilter, RewardRepository};
use lpm_domain::{Amount, Position, Reward};
use std::sync::Arc;

/// Stores rewards collected from closed positions.
pub struct RewardManager {
    repo: Arc<RewardRepository>,
}

impl RewardManager {
    /// Creates a manager over the reward store.
    pub fn new(repo: Arc<RewardRepository>) -> Self {
        Self { repo }
    }

    /// Appends rewards for a position.
    pub async fn add(
        &self,
        position: &Position,
        amounts: Vec<Amount>,
    ) -> Result<Vec<Reward>, ExecutionError> {
        if amounts.is_empty() {
            return Ok(Vec::new());
        }
        let rewards: Vec<Reward> = amounts
            .into_iter()
            .map(|amount| Reward::new(position.id, amount))
            .collect();
        self.repo
            .save_all(&rewards)
            .await
            .storage("save rewards in repo")?;
        Ok(rewards)
    }

    /// Rewards recorded for `position`.
    pub async fn get_position_rewards(
        &self,
        position: &Position,
    ) -> Result<Vec<Reward>, ExecutionError> {
        self.repo
            .find(&RewardFilter::for_position(position.id))
            .await
            .storage("find position rewards")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{VecRepository, base, human, open_position, quote};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_rewards_are_appended() {
        let manager = RewardManager::new(Arc::new(VecRepository::<Reward>::new()));
        let position = open_position();

        manager
            .add(&position, vec![human(base(), dec!(1))])
            .await
            .unwrap();
        let added = manager
            .add(&position, vec![human(quote(), dec!(2)), human(quote(), dec!(3))])
            .await
            .unwrap();
        assert_eq!(added.len(), 2);

        let all = manager.get_position_rewards(&position).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].amount, human(base(), dec!(1)));
        assert_eq!(all[2].amount, human(quote(), dec!(3)));
    }

    #[tokio::test]
    async fn test_no_amounts_adds_nothing() {
        let manager = RewardManager::new(Arc::new(VecRepository::<Reward>::new()));
        let position = open_position();
        assert!(manager.add(&position, Vec::new()).await.unwrap().is_empty());
        assert!(manager.get_position_rewards(&position).await.unwrap().is_empty());
    }
}
