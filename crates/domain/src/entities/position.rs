use crate::entities::pool::Pool;
use crate::entities::project::ProjectId;
use crate::enums::{PairSide, PositionStatus};
use crate::error::EntityError;
use crate::value_objects::{amount::Amount, price::Price, price_range::PositionRange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub Uuid);

impl PositionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PositionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Live state of a position as reported by the liquidity venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub price: Price,
    pub base: Amount,
    pub quote: Amount,
    pub base_accrued_fees: Amount,
    pub quote_accrued_fees: Amount,
}

/// One concentrated-liquidity position.
///
/// `current_*` fields are refreshed by [`Position::actualize`], `out_*`
/// fields are filled by [`Position::close`]. A closed position rejects both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub project_id: ProjectId,
    pub pool: Pool,
    pub address: String,
    pub range: PositionRange,
    pub liquidity: u128,
    pub in_base: Amount,
    pub in_quote: Amount,
    out_base: Amount,
    out_quote: Amount,
    status: PositionStatus,
    pub transaction_fee: Amount,
    pub created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    current_price: Price,
    current_base: Amount,
    current_quote: Amount,
    current_base_accrued_fees: Amount,
    current_quote_accrued_fees: Amount,
}

impl Position {
    /// A freshly opened position: outputs and accrued fees zeroed, current
    /// state seeded from the deposit.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        project_id: ProjectId,
        pool: Pool,
        address: impl Into<String>,
        range: PositionRange,
        liquidity: u128,
        in_base: Amount,
        in_quote: Amount,
        transaction_fee: Amount,
    ) -> Result<Self, EntityError> {
        ensure_side(&pool, &in_base, PairSide::Base)?;
        ensure_side(&pool, &in_quote, PairSide::Quote)?;
        let base = pool.base_token().clone();
        let quote = pool.quote_token().clone();
        Ok(Self {
            id: PositionId::new(),
            project_id,
            address: address.into(),
            range,
            liquidity,
            out_base: Amount::zero(base.clone()),
            out_quote: Amount::zero(quote.clone()),
            status: PositionStatus::Open,
            transaction_fee,
            created_at: Utc::now(),
            closed_at: None,
            current_price: range.initial_price,
            current_base: in_base.clone(),
            current_quote: in_quote.clone(),
            current_base_accrued_fees: Amount::zero(base),
            current_quote_accrued_fees: Amount::zero(quote),
            in_base,
            in_quote,
            pool,
        })
    }

    pub fn status(&self) -> PositionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    pub fn lower_price(&self) -> Price {
        self.range.lower_price
    }

    pub fn upper_price(&self) -> Price {
        self.range.upper_price
    }

    pub fn initial_price(&self) -> Price {
        self.range.initial_price
    }

    pub fn out_base(&self) -> &Amount {
        &self.out_base
    }

    pub fn out_quote(&self) -> &Amount {
        &self.out_quote
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn current_price(&self) -> Price {
        self.current_price
    }

    pub fn current_base(&self) -> &Amount {
        &self.current_base
    }

    pub fn current_quote(&self) -> &Amount {
        &self.current_quote
    }

    pub fn current_base_accrued_fees(&self) -> &Amount {
        &self.current_base_accrued_fees
    }

    pub fn current_quote_accrued_fees(&self) -> &Amount {
        &self.current_quote_accrued_fees
    }

    /// Inclusive on both bounds.
    pub fn is_in_range(&self) -> bool {
        self.range.contains(self.current_price)
    }

    pub fn actualize(&mut self, state: PositionState) -> Result<(), EntityError> {
        self.ensure_open()?;
        ensure_side(&self.pool, &state.base, PairSide::Base)?;
        ensure_side(&self.pool, &state.base_accrued_fees, PairSide::Base)?;
        ensure_side(&self.pool, &state.quote, PairSide::Quote)?;
        ensure_side(&self.pool, &state.quote_accrued_fees, PairSide::Quote)?;

        self.current_price = state.price;
        self.current_base = state.base;
        self.current_quote = state.quote;
        self.current_base_accrued_fees = state.base_accrued_fees;
        self.current_quote_accrued_fees = state.quote_accrued_fees;
        Ok(())
    }

    pub fn close(
        &mut self,
        out_base: Amount,
        out_quote: Amount,
        closed_at: DateTime<Utc>,
    ) -> Result<(), EntityError> {
        self.ensure_open()?;
        ensure_side(&self.pool, &out_base, PairSide::Base)?;
        ensure_side(&self.pool, &out_quote, PairSide::Quote)?;

        self.out_base = out_base;
        self.out_quote = out_quote;
        self.status = PositionStatus::Closed;
        self.closed_at = Some(closed_at);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), EntityError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(EntityError::PositionClosed(self.id.to_string()))
        }
    }
}

fn ensure_side(pool: &Pool, amount: &Amount, side: PairSide) -> Result<(), EntityError> {
    if pool.pair.token(side) == amount.token() {
        Ok(())
    } else {
        Err(EntityError::ForeignToken {
            token: amount.token().describe(),
            pair: pool.pair.to_string(),
        })
    }
}
