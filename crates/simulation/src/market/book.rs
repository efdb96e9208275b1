//! Paper market bookkeeping: listed pools, positions and wallet balances.

use crate::error::SimulationError;
use crate::liquidity::LiquidityModel;
use crate::price_path::PricePathGenerator;
use crate::volume::VolumeModel;
use lpm_domain::math::concentrated_liquidity::amounts_for_liquidity;
use lpm_domain::{Amount, AmountError, Pool, Price, Token};
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use std::sync::Arc;

/// Liquidity is tracked as a human-unit `Decimal` and reported to callers
/// scaled by this factor and truncated.
pub const LIQUIDITY_SCALE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

pub fn scaled_liquidity(liquidity: Decimal) -> u128 {
    liquidity
        .checked_mul(LIQUIDITY_SCALE)
        .unwrap_or(Decimal::MAX)
        .trunc()
        .to_u128()
        .unwrap_or(0)
}

/// A pool listed on the paper market with the models that drive it.
pub struct PoolListing {
    pub(crate) pool: Pool,
    pub(crate) path: Box<dyn PricePathGenerator>,
    pub(crate) liquidity: Box<dyn LiquidityModel>,
    pub(crate) volume: Box<dyn VolumeModel>,
}

impl PoolListing {
    pub fn new(
        pool: Pool,
        path: Box<dyn PricePathGenerator>,
        liquidity: Box<dyn LiquidityModel>,
        volume: Box<dyn VolumeModel>,
    ) -> Self {
        Self {
            pool,
            path,
            liquidity,
            volume,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub(crate) fn price(&self) -> Price {
        self.pool.last_price
    }

    pub(crate) fn external_liquidity(&self) -> Decimal {
        self.liquidity.get_liquidity_at_price(self.price().value)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PaperPosition {
    pub address: String,
    pub owner: String,
    pub pool_address: String,
    pub lower: Decimal,
    pub upper: Decimal,
    pub liquidity: Decimal,
    pub base_fees: Decimal,
    pub quote_fees: Decimal,
    pub open: bool,
}

impl PaperPosition {
    pub fn in_range(&self, price: Price) -> bool {
        price.value >= self.lower && price.value <= self.upper
    }

    /// Principal held at `price`, in human units.
    pub fn holdings(&self, price: Price) -> Result<(Decimal, Decimal), SimulationError> {
        amounts_for_liquidity(self.liquidity, price.value, self.lower, self.upper)
            .map_err(SimulationError::Math)
    }
}

type BalanceKey = (String, String, String);

fn balance_key(owner: &str, token: &Token) -> BalanceKey {
    (
        owner.to_string(),
        token.network.clone(),
        token.address.clone(),
    )
}

/// Wallet balances in base units.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    balances: HashMap<BalanceKey, U256>,
}

impl Ledger {
    pub fn balance(&self, owner: &str, token: &Arc<Token>) -> Amount {
        let raw = self
            .balances
            .get(&balance_key(owner, token))
            .copied()
            .unwrap_or_default();
        Amount::new(Arc::clone(token), raw)
    }

    pub fn credit(&mut self, owner: &str, amount: &Amount) -> Result<(), SimulationError> {
        let entry = self
            .balances
            .entry(balance_key(owner, amount.token()))
            .or_default();
        *entry = entry
            .checked_add(amount.raw())
            .ok_or(AmountError::Overflow)?;
        Ok(())
    }

    /// Debits every amount or none of them.
    pub fn debit_all(&mut self, owner: &str, amounts: &[Amount]) -> Result<(), SimulationError> {
        let mut required: HashMap<BalanceKey, (Arc<Token>, U256)> = HashMap::new();
        for amount in amounts {
            let slot = required
                .entry(balance_key(owner, amount.token()))
                .or_insert_with(|| (Arc::clone(amount.token()), U256::zero()));
            slot.1 = slot.1.checked_add(amount.raw()).ok_or(AmountError::Overflow)?;
        }

        for (key, (token, needed)) in &required {
            let available = self.balances.get(key).copied().unwrap_or_default();
            if available < *needed {
                return Err(SimulationError::InsufficientBalance {
                    token: token.ticker.clone(),
                    required: Amount::new(Arc::clone(token), *needed).to_string(),
                    available: Amount::new(Arc::clone(token), available).to_string(),
                });
            }
        }

        for (key, (_, needed)) in required {
            if let Some(balance) = self.balances.get_mut(&key) {
                *balance -= needed;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usdc() -> Arc<Token> {
        Arc::new(Token::new("paper", "0xusdc", "USDC", 6))
    }

    fn eth() -> Arc<Token> {
        Arc::new(Token::new("paper", "0xeth", "ETH", 18))
    }

    #[test]
    fn test_debit_all_is_all_or_nothing() {
        let mut ledger = Ledger::default();
        ledger
            .credit("0xa", &Amount::from_human(usdc(), dec!(100)).unwrap())
            .unwrap();
        ledger
            .credit("0xa", &Amount::from_human(eth(), dec!(1)).unwrap())
            .unwrap();

        let err = ledger
            .debit_all(
                "0xa",
                &[
                    Amount::from_human(usdc(), dec!(50)).unwrap(),
                    Amount::from_human(eth(), dec!(2)).unwrap(),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, SimulationError::InsufficientBalance { .. }));
        assert_eq!(
            ledger.balance("0xa", &usdc()),
            Amount::from_human(usdc(), dec!(100)).unwrap()
        );
    }

    #[test]
    fn test_debits_of_one_token_are_summed() {
        let mut ledger = Ledger::default();
        ledger
            .credit("0xa", &Amount::from_human(usdc(), dec!(10)).unwrap())
            .unwrap();
        let half = Amount::from_human(usdc(), dec!(6)).unwrap();
        assert!(ledger.debit_all("0xa", &[half.clone(), half]).is_err());
    }

    #[test]
    fn test_balances_are_per_owner() {
        let mut ledger = Ledger::default();
        ledger
            .credit("0xa", &Amount::from_human(usdc(), dec!(10)).unwrap())
            .unwrap();
        assert!(ledger.balance("0xb", &usdc()).is_zero());
    }

    #[test]
    fn test_scaled_liquidity_truncates() {
        assert_eq!(scaled_liquidity(dec!(1.2345678)), 1_234_567);
    }
}
