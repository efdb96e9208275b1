//! Position sizing: splitting an investment across the pair and deciding
//! whether the wallet can fund it, with a swap if one side is short.

use lpm_domain::{Amount, AmountError, PairSide, Percent, Pool, PositionRange, Price};
use serde::Serialize;
use std::cmp::Ordering;

/// A swap that covers a shortfall: pay at most `amount_in` of the surplus
/// token to receive `amount_out` of the short one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapPlan {
    /// Price the swap is planned at.
    pub price: Price,
    /// Most of the surplus token to pay.
    pub amount_in: Amount,
    /// Amount of the short token to receive.
    pub amount_out: Amount,
}

impl SwapPlan {
    /// A plan that moves nothing. Produced when a balance exactly equals
    /// what the position needs.
    pub fn is_empty(&self) -> bool {
        self.amount_out.is_zero()
    }
}

/// Whether the wallet can fund a position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Feasibility {
    /// Balances cannot cover the position even after a swap.
    Infeasible,
    /// Balances cover both sides as they are.
    Ready,
    /// One side is short; the plan covers it from the other.
    NeedsSwap(SwapPlan),
}

impl Feasibility {
    /// True unless [`Feasibility::Infeasible`].
    pub fn is_feasible(&self) -> bool {
        !matches!(self, Feasibility::Infeasible)
    }

    /// The swap to route before opening, if it moves anything.
    pub fn swap(&self) -> Option<&SwapPlan> {
        match self {
            Feasibility::NeedsSwap(plan) if !plan.is_empty() => Some(plan),
            _ => None,
        }
    }
}

/// Everything computed while sizing a new position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    /// Range the position would be opened in.
    pub range: PositionRange,
    /// Investment for this position.
    pub investment: Amount,
    /// Base share of the investment before fitting to the range.
    pub provisional_base: Amount,
    /// Quote share of the investment before fitting to the range.
    pub provisional_quote: Amount,
    /// Base amount the range actually needs.
    pub base_needed: Amount,
    /// Quote amount the range actually needs.
    pub quote_needed: Amount,
    /// Liquidity the needed amounts provide.
    pub liquidity: u128,
    /// Wallet base balance when sizing.
    pub base_balance: Amount,
    /// Wallet quote balance when sizing.
    pub quote_balance: Amount,
    /// Funding decision.
    pub feasibility: Feasibility,
}

/// Splits `investment` in half and prices the other half in the opposite
/// token. Returns `None` when the investment token is not in the pool.
pub fn provisional_amounts(
    pool: &Pool,
    investment: &Amount,
    price: Price,
) -> Result<Option<(Amount, Amount)>, AmountError> {
    let half = investment.checked_div(2u32)?;
    let pair = &pool.pair;
    match pair.side_of(investment.token()) {
        Some(PairSide::Base) => {
            let quote = price.quote_for(&half, &pair.quote)?;
            Ok(Some((half, quote)))
        }
        Some(PairSide::Quote) => {
            let base = price.base_for(&half, &pair.base)?;
            Ok(Some((base, half)))
        }
        None => Ok(None),
    }
}

/// Decides whether the balances can fund a position needing `base_needed`
/// and `quote_needed`.
///
/// Both balances strictly short: infeasible. Both strictly in excess: ready.
/// Otherwise the short side (base first) is bought with the other token at
/// `price`, paying up to `cost + cost * slippage`; the other balance must
/// cover its own need plus that. A side that exactly matches its need yields
/// an empty plan.
pub fn can_be_opened(
    price: Price,
    base_needed: &Amount,
    quote_needed: &Amount,
    base_balance: &Amount,
    quote_balance: &Amount,
    slippage: Percent,
) -> Result<Feasibility, AmountError> {
    let base_cmp = base_balance.checked_cmp(base_needed)?;
    let quote_cmp = quote_balance.checked_cmp(quote_needed)?;

    if base_cmp == Ordering::Less && quote_cmp == Ordering::Less {
        return Ok(Feasibility::Infeasible);
    }
    if base_cmp == Ordering::Greater && quote_cmp == Ordering::Greater {
        return Ok(Feasibility::Ready);
    }

    if base_cmp == Ordering::Less {
        let delta = base_needed.saturating_sub(base_balance)?;
        let cost = price.quote_for(&delta, quote_needed.token())?;
        let inflated = cost.checked_add(&cost.checked_mul(slippage)?)?;
        let required = quote_needed.checked_add(&inflated)?;
        if quote_balance.checked_cmp(&required)? == Ordering::Less {
            return Ok(Feasibility::Infeasible);
        }
        Ok(Feasibility::NeedsSwap(SwapPlan {
            price,
            amount_in: inflated,
            amount_out: delta,
        }))
    } else {
        let delta = quote_needed.saturating_sub(quote_balance)?;
        let cost = price.base_for(&delta, base_needed.token())?;
        let inflated = cost.checked_add(&cost.checked_mul(slippage)?)?;
        let required = base_needed.checked_add(&inflated)?;
        if base_balance.checked_cmp(&required)? == Ordering::Less {
            return Ok(Feasibility::Infeasible);
        }
        Ok(Feasibility::NeedsSwap(SwapPlan {
            price,
            amount_in: inflated,
            amount_out: delta,
        }))
    }
}
