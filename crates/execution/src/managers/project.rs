use crate::error::{CollaboratorResultExt, ExecutionError, RepositoryResultExt};
use crate::ports::BalanceProvider;
use crate::repository::{ProjectFilter, ProjectRepository};
use lpm_domain::{Amount, InactiveReason, Percent, Pool, Project, ProjectId, Wallet};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::sync::Arc;

/// Input to [`ProjectManager::new_project`].
pub struct NewProject {
    /// Wallet that funds the positions and pays gas.
    pub wallet: Wallet,
    /// Pool to provide liquidity in.
    pub pool: Pool,
    /// Display name.
    pub name: String,
    /// Total investment, in one of the pool's tokens.
    pub investments: Amount,
    /// Target gain over the investment; not less than zero.
    pub take_profit: Percent,
    /// Loss fraction that deactivates the project, in `[0, 1]`.
    pub stop_loss: Percent,
    /// Half-width of each position's range, in `(0, 1)`.
    pub range_volatility: Percent,
    /// Tolerated slippage on swaps and withdrawals, in `[0, 1)`.
    pub slippage: Percent,
    /// Positions the investment is split across; at least 1.
    pub active_positions: u32,
}

/// Creates projects and persists their state changes.
pub struct ProjectManager {
    repo: Arc<ProjectRepository>,
    balance: Arc<dyn BalanceProvider>,
}

impl ProjectManager {
    /// Creates a manager over the project store and balance provider.
    pub fn new(repo: Arc<ProjectRepository>, balance: Arc<dyn BalanceProvider>) -> Self {
        Self { repo, balance }
    }

    /// Creates and stores a project after checking the wallet can fund it.
    pub async fn new_project(&self, input: NewProject) -> Result<Project, ExecutionError> {
        if input.active_positions == 0 {
            return Err(ExecutionError::InvalidProject(
                "active positions must be at least 1".to_string(),
            ));
        }
        check_fraction("take profit", input.take_profit, None)?;
        check_fraction("stop loss", input.stop_loss, Some(Bound::Inclusive))?;
        check_fraction("slippage", input.slippage, Some(Bound::Exclusive))?;
        check_fraction("range volatility", input.range_volatility, Some(Bound::Exclusive))?;
        if input.range_volatility.value().is_zero() {
            return Err(ExecutionError::InvalidProject(
                "range volatility must be greater than zero".to_string(),
            ));
        }
        if !input.pool.pair.contains(input.investments.token()) {
            return Err(ExecutionError::InvalidInvestmentToken {
                token: input.investments.token().describe(),
                pair: input.pool.pair.to_string(),
            });
        }

        let balance = self
            .balance
            .get(&input.wallet, input.investments.token())
            .await
            .collaborator("check funds for investment")?;
        if balance.checked_cmp(&input.investments)? == Ordering::Less {
            return Err(ExecutionError::InvestmentsNotEnough {
                required: input.investments.to_string(),
                available: balance.to_string(),
            });
        }

        let project = Project::new(
            input.wallet,
            input.pool,
            input.name,
            input.investments,
            input.take_profit,
            input.stop_loss,
            input.range_volatility,
            input.slippage,
            input.active_positions,
        );
        self.repo
            .save(&project)
            .await
            .storage("save project after create")?;
        Ok(project)
    }

    /// Project with `id`, or `NotFound`.
    pub async fn get(&self, id: ProjectId) -> Result<Project, ExecutionError> {
        self.repo
            .find_one(&ProjectFilter::by_id(id))
            .await
            .storage("find project")?
            .ok_or(ExecutionError::NotFound("project"))
    }

    /// All active projects.
    pub async fn active(&self) -> Result<Vec<Project>, ExecutionError> {
        self.repo
            .find(&ProjectFilter::active())
            .await
            .storage("find active projects")
    }

    /// Deactivates `project` for `reason` and saves it.
    pub async fn deactivate(
        &self,
        project: &mut Project,
        reason: InactiveReason,
    ) -> Result<(), ExecutionError> {
        project.deactivate(reason);
        self.repo
            .save(project)
            .await
            .storage("save project after deactivate")
    }

    /// Records a new worth for `project` and saves it.
    pub async fn update_worth(
        &self,
        project: &mut Project,
        worth: Amount,
    ) -> Result<(), ExecutionError> {
        project.update_worth(worth)?;
        self.repo
            .save(project)
            .await
            .storage("save project after update worth")
    }

    /// Swaps in a refreshed pool snapshot.
    pub async fn replace_pool(&self, project: &mut Project, pool: Pool) -> Result<(), ExecutionError> {
        project.replace_pool(pool);
        self.repo
            .save(project)
            .await
            .storage("save project after pool refresh")
    }
}

/// How a fraction may approach one.
#[derive(Clone, Copy)]
enum Bound {
    Inclusive,
    Exclusive,
}

/// Rejects negative fractions, and fractions above (or at) one when bounded.
fn check_fraction(
    name: &str,
    value: Percent,
    upper: Option<Bound>,
) -> Result<(), ExecutionError> {
    let v = value.value();
    let out_of_range = v < Decimal::ZERO
        || match upper {
            Some(Bound::Inclusive) => v > Decimal::ONE,
            Some(Bound::Exclusive) => v >= Decimal::ONE,
            None => false,
        };
    if out_of_range {
        return Err(ExecutionError::InvalidProject(format!(
            "{name} out of range: {value}"
        )));
    }
    Ok(())
}
