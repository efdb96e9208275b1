//! Fixed-point token amounts.
//!
//! An [`Amount`] is an integer number of base units bound to the token it
//! was measured in. Combining two amounts checks token identity and reports
//! a mismatch as [`AmountError::TokenMismatch`] instead of producing a value.

use crate::entities::token::Token;
use crate::error::AmountError;
use crate::value_objects::percentage::Percent;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Right-hand side of [`Amount::checked_mul`] and [`Amount::checked_div`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A whole multiplier: integers, counts, or another amount's base units.
    Whole(U256),
    /// A fractional multiplier applied in fixed point; the result is
    /// truncated to whole base units.
    Decimal(Decimal),
}

impl From<u32> for Operand {
    fn from(v: u32) -> Self {
        Operand::Whole(U256::from(v))
    }
}

impl From<u64> for Operand {
    fn from(v: u64) -> Self {
        Operand::Whole(U256::from(v))
    }
}

impl From<usize> for Operand {
    fn from(v: usize) -> Self {
        Operand::Whole(U256::from(v))
    }
}

impl From<U256> for Operand {
    fn from(v: U256) -> Self {
        Operand::Whole(v)
    }
}

impl From<&Amount> for Operand {
    fn from(a: &Amount) -> Self {
        Operand::Whole(a.raw)
    }
}

impl From<Decimal> for Operand {
    fn from(d: Decimal) -> Self {
        Operand::Decimal(d)
    }
}

impl From<Percent> for Operand {
    fn from(p: Percent) -> Self {
        Operand::Decimal(p.value())
    }
}

/// A quantity of a specific token in its smallest (base) unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    token: Arc<Token>,
    raw: U256,
}

impl Amount {
    pub fn new(token: Arc<Token>, raw: impl Into<U256>) -> Self {
        Self {
            token,
            raw: raw.into(),
        }
    }

    pub fn zero(token: Arc<Token>) -> Self {
        Self::new(token, U256::zero())
    }

    /// Builds an amount from a human-readable value, dropping fractional
    /// base units.
    pub fn from_human(token: Arc<Token>, human: Decimal) -> Result<Self, AmountError> {
        let raw = token.to_base_value(human)?;
        Ok(Self { token, raw })
    }

    pub fn token(&self) -> &Arc<Token> {
        &self.token
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn is_token(&self, token: &Token) -> bool {
        *self.token == *token
    }

    /// Human-readable value using the token's decimals.
    pub fn human_value(&self) -> Result<Decimal, AmountError> {
        self.token.to_human_value(self.raw)
    }

    pub fn checked_add(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.ensure_same_token(other, "add")?;
        let raw = self.raw.checked_add(other.raw).ok_or(AmountError::Overflow)?;
        Ok(self.with_raw(raw))
    }

    pub fn checked_sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.ensure_same_token(other, "subtract")?;
        let raw = self
            .raw
            .checked_sub(other.raw)
            .ok_or_else(|| AmountError::Underflow {
                minuend: self.to_string(),
                subtrahend: other.to_string(),
            })?;
        Ok(self.with_raw(raw))
    }

    /// Subtracts `other`, clamping at zero. Tokens must still match.
    pub fn saturating_sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.ensure_same_token(other, "subtract")?;
        Ok(self.with_raw(self.raw.saturating_sub(other.raw)))
    }

    pub fn checked_cmp(&self, other: &Amount) -> Result<Ordering, AmountError> {
        self.ensure_same_token(other, "compare")?;
        Ok(self.raw.cmp(&other.raw))
    }

    pub fn checked_mul(&self, operand: impl Into<Operand>) -> Result<Amount, AmountError> {
        let raw = match operand.into() {
            Operand::Whole(v) => self.raw.checked_mul(v).ok_or(AmountError::Overflow)?,
            Operand::Decimal(d) => mul_decimal(self.raw, d)?,
        };
        Ok(self.with_raw(raw))
    }

    /// Truncating division; the remainder is dropped.
    pub fn checked_div(&self, operand: impl Into<Operand>) -> Result<Amount, AmountError> {
        let raw = match operand.into() {
            Operand::Whole(v) => {
                if v.is_zero() {
                    return Err(AmountError::DivisionByZero);
                }
                self.raw / v
            }
            Operand::Decimal(d) => div_decimal(self.raw, d)?,
        };
        Ok(self.with_raw(raw))
    }

    fn with_raw(&self, raw: U256) -> Amount {
        Amount {
            token: Arc::clone(&self.token),
            raw,
        }
    }

    fn ensure_same_token(&self, other: &Amount, op: &'static str) -> Result<(), AmountError> {
        if self.token == other.token {
            Ok(())
        } else {
            Err(AmountError::TokenMismatch {
                op,
                left: self.token.describe(),
                right: other.token.describe(),
            })
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.human_value() {
            Ok(human) => write!(
                f,
                "{} {} ({} {})",
                self.raw, self.token.ticker, human, self.token.ticker
            ),
            Err(_) => write!(f, "{} {}", self.raw, self.token.ticker),
        }
    }
}

/// Splits a non-negative decimal into `(mantissa, scale)`.
pub(crate) fn unsigned_parts(d: Decimal) -> Result<(U256, u32), AmountError> {
    if d.is_sign_negative() && !d.is_zero() {
        return Err(AmountError::NegativeOperand(d.to_string()));
    }
    Ok((U256::from(d.mantissa().unsigned_abs()), d.scale()))
}

pub(crate) fn pow10(exp: u32) -> Result<U256, AmountError> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(AmountError::Overflow)
}

/// `raw * factor`, truncated.
pub(crate) fn mul_decimal(raw: U256, factor: Decimal) -> Result<U256, AmountError> {
    let (mantissa, scale) = unsigned_parts(factor)?;
    let product = raw.checked_mul(mantissa).ok_or(AmountError::Overflow)?;
    Ok(product / pow10(scale)?)
}

/// `raw / divisor`, truncated.
pub(crate) fn div_decimal(raw: U256, divisor: Decimal) -> Result<U256, AmountError> {
    let (mantissa, scale) = unsigned_parts(divisor)?;
    if mantissa.is_zero() {
        return Err(AmountError::DivisionByZero);
    }
    let scaled = raw.checked_mul(pow10(scale)?).ok_or(AmountError::Overflow)?;
    Ok(scaled / mantissa)
}
