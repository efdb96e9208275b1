use crate::error::AmountError;
use crate::value_objects::amount::{mul_decimal, pow10};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Largest scale a `rust_decimal::Decimal` can carry.
const MAX_DECIMAL_SCALE: u8 = 28;

/// A tradable asset. Identity is `(network, address)`; the ticker and
/// decimals are descriptive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub network: String,
    pub address: String,
    pub ticker: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(
        network: impl Into<String>,
        address: impl Into<String>,
        ticker: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            network: network.into(),
            address: address.into(),
            ticker: ticker.into(),
            decimals,
        }
    }

    /// One whole token in base units (`10^decimals`).
    pub fn unit(&self) -> Result<U256, AmountError> {
        pow10(u32::from(self.decimals))
    }

    /// Converts a human value to base units, truncating fractional units.
    pub fn to_base_value(&self, human: Decimal) -> Result<U256, AmountError> {
        mul_decimal(self.unit()?, human)
    }

    /// Converts base units to a human value. Exact while `raw` fits in 96
    /// bits.
    pub fn to_human_value(&self, raw: U256) -> Result<Decimal, AmountError> {
        if self.decimals > MAX_DECIMAL_SCALE {
            return Err(AmountError::UnsupportedDecimals {
                ticker: self.ticker.clone(),
                decimals: self.decimals,
            });
        }
        if raw.bits() > 96 {
            return Err(AmountError::Overflow);
        }
        let mantissa = i128::try_from(raw.as_u128()).map_err(|_| AmountError::Overflow)?;
        Decimal::try_from_i128_with_scale(mantissa, u32::from(self.decimals))
            .map(|d| d.normalize())
            .map_err(|_| AmountError::Overflow)
    }

    /// Full identity for diagnostics.
    pub fn describe(&self) -> String {
        format!("[{}, {}, {}]", self.network, self.address, self.ticker)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.network.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identity_ignores_ticker_and_decimals() {
        let a = Token::new("ethereum", "0xa0b8", "USDC", 6);
        let b = Token::new("ethereum", "0xa0b8", "usdc", 18);
        let c = Token::new("arbitrum", "0xa0b8", "USDC", 6);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_base_value_round_trip() {
        let token = Token::new("ethereum", "0xc02a", "WETH", 18);
        for raw in [0u128, 1, 999, 1_000_000_000_000_000_000, 123_456_789_012_345_678_901] {
            let raw = U256::from(raw);
            let human = token.to_human_value(raw).unwrap();
            assert_eq!(token.to_base_value(human).unwrap(), raw);
        }
    }

    #[test]
    fn test_to_base_value_truncates() {
        let token = Token::new("ethereum", "0xa0b8", "USDC", 6);
        assert_eq!(token.to_base_value(dec!(0.0000019)).unwrap(), U256::from(1u64));
        assert!(token.to_base_value(dec!(-1)).is_err());
    }

    #[test]
    fn test_to_human_value_rejects_oversized_values() {
        let token = Token::new("ethereum", "0xc02a", "WETH", 18);
        assert_eq!(token.to_human_value(U256::MAX), Err(AmountError::Overflow));

        let exotic = Token::new("ethereum", "0xdead", "EXO", 30);
        assert!(matches!(
            exotic.to_human_value(U256::one()),
            Err(AmountError::UnsupportedDecimals { .. })
        ));
    }
}
