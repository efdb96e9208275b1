use crate::entities::pool::Pool;
use crate::entities::wallet::Wallet;
use crate::enums::{InactiveReason, ProjectStatus};
use crate::error::{AmountError, EntityError};
use crate::value_objects::{amount::Amount, percentage::Percent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A liquidity strategy: one wallet providing into one pool under a set of
/// risk parameters.
///
/// Lifecycle state (`status`, `inactive_reason`, `current_value`) is only
/// changed through [`Project::deactivate`] and [`Project::update_worth`].
/// Deactivation is terminal.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub wallet: Wallet,
    pub pool: Pool,
    pub name: String,
    pub investments: Amount,
    pub take_profit: Percent,
    pub stop_loss: Percent,
    pub range_volatility: Percent,
    pub slippage: Percent,
    pub active_positions: u32,
    current_value: Amount,
    status: ProjectStatus,
    inactive_reason: Option<InactiveReason>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wallet: Wallet,
        pool: Pool,
        name: impl Into<String>,
        investments: Amount,
        take_profit: Percent,
        stop_loss: Percent,
        range_volatility: Percent,
        slippage: Percent,
        active_positions: u32,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            wallet,
            pool,
            name: name.into(),
            current_value: investments.clone(),
            investments,
            take_profit,
            stop_loss,
            range_volatility,
            slippage,
            active_positions,
            status: ProjectStatus::Active,
            inactive_reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    pub fn inactive_reason(&self) -> Option<InactiveReason> {
        self.inactive_reason
    }

    pub fn current_value(&self) -> &Amount {
        &self.current_value
    }

    pub fn deactivate(&mut self, reason: InactiveReason) {
        self.status = ProjectStatus::Inactive;
        self.inactive_reason = Some(reason);
    }

    /// Overwrites the tracked worth. Must be denominated in the investment
    /// token.
    pub fn update_worth(&mut self, worth: Amount) -> Result<(), EntityError> {
        if worth.token() != self.investments.token() {
            return Err(AmountError::TokenMismatch {
                op: "update_worth",
                left: self.investments.token().describe(),
                right: worth.token().describe(),
            }
            .into());
        }
        self.current_value = worth;
        Ok(())
    }

    pub fn replace_pool(&mut self, pool: Pool) {
        self.pool = pool;
    }

    /// `investments - investments * stop_loss`
    pub fn stop_loss_limit(&self) -> Result<Amount, AmountError> {
        let loss = self.investments.checked_mul(self.stop_loss)?;
        self.investments.checked_sub(&loss)
    }

    /// Strictly below the limit; a worth equal to the limit is tolerated.
    pub fn is_stop_loss_breached(&self) -> Result<bool, AmountError> {
        let limit = self.stop_loss_limit()?;
        Ok(self.current_value.checked_cmp(&limit)? == Ordering::Less)
    }

    /// `investments + investments * take_profit`. Reported only; no cycle
    /// acts on it.
    pub fn take_profit_target(&self) -> Result<Amount, AmountError> {
        let gain = self.investments.checked_mul(self.take_profit)?;
        self.investments.checked_add(&gain)
    }

    /// Investment allotted to each position, remainder dropped.
    pub fn per_position_investment(&self) -> Result<Amount, AmountError> {
        self.investments.checked_div(self.active_positions)
    }
}
