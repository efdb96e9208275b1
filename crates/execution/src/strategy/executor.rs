use super::outcome::CycleOutcome;
use super::sizing::{SizingReport, can_be_opened, provisional_amounts};
use super::worth::position_worth;
use crate::error::{CollaboratorResultExt, ExecutionError};
use crate::managers::{
    NewOrder, OpenPosition, OrderManager, PoolManager, PositionManager, ProjectManager,
    RewardManager,
};
use crate::ports::BalanceProvider;
use lpm_domain::{InactiveReason, Position, Project};
use std::sync::Arc;

/// Runs one evaluation cycle for a project.
///
/// Awaits are strictly sequential. Callers must not run two cycles for the
/// same project concurrently.
pub struct ProjectExecutor {
    pools: Arc<PoolManager>,
    positions: Arc<PositionManager>,
    projects: Arc<ProjectManager>,
    orders: Arc<OrderManager>,
    rewards: Arc<RewardManager>,
    balance: Arc<dyn BalanceProvider>,
}

impl ProjectExecutor {
    /// Creates an executor over the given managers and balance provider.
    pub fn new(
        pools: Arc<PoolManager>,
        positions: Arc<PositionManager>,
        projects: Arc<ProjectManager>,
        orders: Arc<OrderManager>,
        rewards: Arc<RewardManager>,
        balance: Arc<dyn BalanceProvider>,
    ) -> Self {
        Self {
            pools,
            positions,
            projects,
            orders,
            rewards,
            balance,
        }
    }

    /// Evaluates `project` once.
    ///
    /// Opens a position when none is open, otherwise checks the open position
    /// and closes it once the price leaves its range. Deactivation for missing
    /// gas or a stop-loss hit comes back as `Ok`; only collaborator failures
    /// are returned as errors.
    pub async fn execute(&self, project: &mut Project) -> Result<CycleOutcome, ExecutionError> {
        let was_active = project.is_active();
        if !self.can_be_executed(project).await? {
            return Ok(match project.inactive_reason() {
                Some(reason) if was_active => CycleOutcome::Deactivated {
                    reason,
                    sizing: None,
                },
                _ => CycleOutcome::Skipped,
            });
        }

        // One position per project.
        let open_positions = self.positions.get_open_positions(project).await?;
        match open_positions.into_iter().next() {
            None => self.open(project).await,
            Some(position) => self.check(project, position).await,
        }
    }

    /// False for inactive projects. Deactivates the project when the wallet
    /// has no gas or the worth fell below the stop-loss limit.
    pub async fn can_be_executed(&self, project: &mut Project) -> Result<bool, ExecutionError> {
        if !project.is_active() {
            return Ok(false);
        }

        let gas = self
            .balance
            .get(&project.wallet, &project.wallet.native_token)
            .await
            .collaborator("get native balance")?;
        if gas.is_zero() {
            self.projects
                .deactivate(project, InactiveReason::NotEnoughGas)
                .await?;
            return Ok(false);
        }

        if project.is_stop_loss_breached()? {
            self.projects
                .deactivate(project, InactiveReason::StopLoss)
                .await?;
            return Ok(false);
        }

        Ok(true)
    }

    async fn open(&self, project: &mut Project) -> Result<CycleOutcome, ExecutionError> {
        let (range, pool) = self
            .pools
            .calculate_position_range(&project.pool, project.range_volatility)
            .await?;
        self.projects.replace_pool(project, pool).await?;

        let investment = project.per_position_investment()?;
        let (provisional_base, provisional_quote) =
            provisional_amounts(&project.pool, &investment, range.initial_price)?.ok_or_else(
                || ExecutionError::InvalidInvestmentToken {
                    token: investment.token().describe(),
                    pair: project.pool.pair.to_string(),
                },
            )?;

        let sized = self
            .pools
            .calculate_position_amounts(
                range,
                provisional_base.clone(),
                provisional_quote.clone(),
            )
            .await?;

        let base_balance = self
            .balance
            .get(&project.wallet, &project.pool.pair.base)
            .await
            .collaborator("get base token balance")?;
        let quote_balance = self
            .balance
            .get(&project.wallet, &project.pool.pair.quote)
            .await
            .collaborator("get quote token balance")?;

        let feasibility = can_be_opened(
            range.initial_price,
            &sized.base,
            &sized.quote,
            &base_balance,
            &quote_balance,
            project.slippage,
        )?;

        let sizing = SizingReport {
            range,
            investment,
            provisional_base,
            provisional_quote,
            base_needed: sized.base.clone(),
            quote_needed: sized.quote.clone(),
            liquidity: sized.liquidity,
            base_balance,
            quote_balance,
            feasibility,
        };

        if !sizing.feasibility.is_feasible() {
            self.projects
                .deactivate(project, InactiveReason::NotEnoughFunds)
                .await?;
            return Ok(CycleOutcome::Deactivated {
                reason: InactiveReason::NotEnoughFunds,
                sizing: Some(sizing),
            });
        }

        let order = match sizing.feasibility.swap() {
            Some(plan) => Some(
                self.orders
                    .new_order(NewOrder {
                        project,
                        amount_in: plan.amount_in.clone(),
                        amount_out: plan.amount_out.clone(),
                        price: plan.price,
                    })
                    .await?,
            ),
            None => None,
        };

        let position = self
            .positions
            .open(OpenPosition {
                project,
                range,
                base: sized.base,
                quote: sized.quote,
            })
            .await?;

        Ok(CycleOutcome::Opened {
            position,
            order,
            sizing,
        })
    }

    async fn check(
        &self,
        project: &mut Project,
        mut position: Position,
    ) -> Result<CycleOutcome, ExecutionError> {
        let pool = self
            .pools
            .get(
                &project.pool.network,
                &project.pool.protocol,
                &project.pool.pair,
                project.pool.fee,
            )
            .await?;
        self.projects.replace_pool(project, pool).await?;

        self.positions.actualize(&mut position).await?;
        if position.is_in_range() {
            return Ok(CycleOutcome::InRange { position });
        }

        self.close(project, position).await
    }

    async fn close(
        &self,
        project: &mut Project,
        mut position: Position,
    ) -> Result<CycleOutcome, ExecutionError> {
        let transaction_fee = self.positions.close(project, &mut position).await?;

        let collected = self.positions.collect_rewards(&position).await?;
        let rewards = self.rewards.add(&position, collected).await?;

        let all_rewards = self.rewards.get_position_rewards(&position).await?;
        let worth = position_worth(project.investments.token(), &position, &all_rewards)?;
        self.projects.update_worth(project, worth.clone()).await?;

        Ok(CycleOutcome::Closed {
            position,
            rewards,
            worth,
            transaction_fee,
        })
    }
}
