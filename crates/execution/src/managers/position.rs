use crate::error::{CollaboratorResultExt, ExecutionError, RepositoryResultExt};
use crate::ports::{
    DecreaseLiquidityRequest, IncreaseLiquidityRequest, LiquidityManager, PositionQuery,
};
use crate::repository::{PositionFilter, PositionRepository};
use chrono::Utc;
use lpm_domain::{Amount, Position, PositionRange, Project};
use std::sync::Arc;

/// Input to [`PositionManager::open`].
pub struct OpenPosition<'a> {
    /// Project that owns the position.
    pub project: &'a Project,
    /// Price range to provide liquidity in.
    pub range: PositionRange,
    /// Base token amount to deposit.
    pub base: Amount,
    /// Quote token amount to deposit.
    pub quote: Amount,
}

/// Opens, refreshes and closes liquidity positions.
pub struct PositionManager {
    repo: Arc<PositionRepository>,
    liquidity: Arc<dyn LiquidityManager>,
}

impl PositionManager {
    /// Creates a manager over the position store and liquidity venue.
    pub fn new(repo: Arc<PositionRepository>, liquidity: Arc<dyn LiquidityManager>) -> Self {
        Self { repo, liquidity }
    }

    /// Open positions of `project`.
    pub async fn get_open_positions(
        &self,
        project: &Project,
    ) -> Result<Vec<Position>, ExecutionError> {
        self.repo
            .find(&PositionFilter::open_for(project.id))
            .await
            .storage("find open positions in repo")
    }

    /// Positions matching `filter`.
    pub async fn find(&self, filter: &PositionFilter) -> Result<Vec<Position>, ExecutionError> {
        self.repo.find(filter).await.storage("find positions in repo")
    }

    /// Provides liquidity and stores the new position.
    pub async fn open(&self, input: OpenPosition<'_>) -> Result<Position, ExecutionError> {
        let project = input.project;
        let pool = &project.pool;
        let receipt = self
            .liquidity
            .increase_liquidity(&IncreaseLiquidityRequest {
                network: pool.network.clone(),
                protocol: pool.protocol.clone(),
                pool_address: pool.address.clone(),
                fee: pool.fee,
                pair: pool.pair.clone(),
                owner: project.wallet.address.clone(),
                range: input.range,
                base: input.base,
                quote: input.quote,
            })
            .await
            .collaborator("liquidity manager: increase liquidity")?;

        let position = Position::open(
            project.id,
            pool.clone(),
            receipt.address,
            input.range,
            receipt.liquidity,
            receipt.base,
            receipt.quote,
            Amount::new(
                Arc::clone(&project.wallet.native_token),
                receipt.transaction_fee,
            ),
        )?;

        self.repo
            .save(&position)
            .await
            .storage("save position in repo after create")?;
        Ok(position)
    }

    /// Refreshes the position's current state from the venue.
    pub async fn actualize(&self, position: &mut Position) -> Result<(), ExecutionError> {
        if !position.is_open() {
            return Err(ExecutionError::PositionClosed(position.id.to_string()));
        }
        let pool = &position.pool;
        let live = self
            .liquidity
            .get_position(&PositionQuery {
                network: pool.network.clone(),
                protocol: pool.protocol.clone(),
                pool_address: pool.address.clone(),
                fee: pool.fee,
                pair: pool.pair.clone(),
                position_address: position.address.clone(),
            })
            .await
            .collaborator("liquidity manager: get position")?;

        position.actualize(live.state)?;
        self.repo
            .save(position)
            .await
            .storage("save position in repo after actualize")
    }

    /// Withdraws all liquidity, capping each side at
    /// `current - current * slippage`, and marks the position closed.
    /// Returns the withdrawal fee in the wallet's native token.
    pub async fn close(
        &self,
        project: &Project,
        position: &mut Position,
    ) -> Result<Amount, ExecutionError> {
        if !position.is_open() {
            return Err(ExecutionError::PositionClosed(position.id.to_string()));
        }
        let base_max = position
            .current_base()
            .checked_sub(&position.current_base().checked_mul(project.slippage)?)?;
        let quote_max = position
            .current_quote()
            .checked_sub(&position.current_quote().checked_mul(project.slippage)?)?;

        let pool = &position.pool;
        let receipt = self
            .liquidity
            .decrease_liquidity(&DecreaseLiquidityRequest {
                network: pool.network.clone(),
                protocol: pool.protocol.clone(),
                pool_address: pool.address.clone(),
                fee: pool.fee,
                pair: pool.pair.clone(),
                owner: project.wallet.address.clone(),
                position_address: position.address.clone(),
                liquidity: position.liquidity,
                base_max,
                quote_max,
            })
            .await
            .collaborator("liquidity manager: decrease liquidity")?;

        position.close(receipt.base, receipt.quote, Utc::now())?;
        self.repo
            .save(position)
            .await
            .storage("save position in repo after close")?;

        Ok(Amount::new(
            Arc::clone(&project.wallet.native_token),
            receipt.transaction_fee,
        ))
    }

    /// Rewards are not collected from the venue yet; always empty.
    pub async fn collect_rewards(&self, _position: &Position) -> Result<Vec<Amount>, ExecutionError> {
        Ok(Vec::new())
    }
}
