use crate::entities::token::Token;
use crate::error::AmountError;
use crate::value_objects::amount::{Amount, pow10, unsigned_parts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Price of the base token expressed in quote tokens (quote per base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }

    /// Converts a base-token amount into `quote_token` units at this price.
    ///
    /// Both tokens' decimals are honoured and the result is truncated to a
    /// whole base unit of the quote token.
    pub fn quote_for(&self, base: &Amount, quote_token: &Arc<Token>) -> Result<Amount, AmountError> {
        let (mantissa, scale) = unsigned_parts(self.value)?;
        let base_decimals = u32::from(base.token().decimals);
        let quote_decimals = u32::from(quote_token.decimals);

        let mut numerator = base
            .raw()
            .checked_mul(mantissa)
            .ok_or(AmountError::Overflow)?;
        let mut denominator = pow10(scale)?;
        if quote_decimals >= base_decimals {
            numerator = numerator
                .checked_mul(pow10(quote_decimals - base_decimals)?)
                .ok_or(AmountError::Overflow)?;
        } else {
            denominator = denominator
                .checked_mul(pow10(base_decimals - quote_decimals)?)
                .ok_or(AmountError::Overflow)?;
        }

        Ok(Amount::new(Arc::clone(quote_token), numerator / denominator))
    }

    /// Converts a quote-token amount into `base_token` units at this price.
    pub fn base_for(&self, quote: &Amount, base_token: &Arc<Token>) -> Result<Amount, AmountError> {
        let (mantissa, scale) = unsigned_parts(self.value)?;
        if mantissa.is_zero() {
            return Err(AmountError::DivisionByZero);
        }
        let base_decimals = u32::from(base_token.decimals);
        let quote_decimals = u32::from(quote.token().decimals);

        let mut numerator = quote
            .raw()
            .checked_mul(pow10(scale)?)
            .ok_or(AmountError::Overflow)?;
        let mut denominator = mantissa;
        if base_decimals >= quote_decimals {
            numerator = numerator
                .checked_mul(pow10(base_decimals - quote_decimals)?)
                .ok_or(AmountError::Overflow)?;
        } else {
            denominator = denominator
                .checked_mul(pow10(quote_decimals - base_decimals)?)
                .ok_or(AmountError::Overflow)?;
        }

        Ok(Amount::new(Arc::clone(base_token), numerator / denominator))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self::new(d)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use rust_decimal_macros::dec;

    fn weth() -> Arc<Token> {
        Arc::new(Token::new("ethereum", "0xc02a", "WETH", 18))
    }

    fn usdc() -> Arc<Token> {
        Arc::new(Token::new("ethereum", "0xa0b8", "USDC", 6))
    }

    #[test]
    fn test_quote_for_scales_decimals() {
        let price = Price::new(dec!(2000.5));
        let one_eth = Amount::from_human(weth(), dec!(1)).unwrap();

        let quote = price.quote_for(&one_eth, &usdc()).unwrap();
        assert_eq!(quote.raw(), U256::from(2_000_500_000u64));
        assert_eq!(quote.token().ticker, "USDC");
    }

    #[test]
    fn test_base_for_scales_decimals() {
        let price = Price::new(dec!(2000));
        let usd = Amount::from_human(usdc(), dec!(500)).unwrap();

        let base = price.base_for(&usd, &weth()).unwrap();
        assert_eq!(base.human_value().unwrap(), dec!(0.25));
    }

    #[test]
    fn test_same_decimals_conversion() {
        let price = Price::new(dec!(2.0));
        let quote = Amount::new(usdc(), 200u64);
        let other = Arc::new(Token::new("ethereum", "0xdac1", "USDT", 6));

        assert_eq!(price.base_for(&quote, &other).unwrap().raw(), U256::from(100u64));
        assert_eq!(price.quote_for(&quote, &other).unwrap().raw(), U256::from(400u64));
    }

    #[test]
    fn test_zero_price_cannot_convert_quote() {
        let price = Price::new(Decimal::ZERO);
        let usd = Amount::new(usdc(), 1u64);
        assert_eq!(price.base_for(&usd, &weth()), Err(AmountError::DivisionByZero));
    }

    #[test]
    fn test_invert() {
        assert_eq!(Price::new(dec!(4)).invert().value, dec!(0.25));
        assert_eq!(Price::new(Decimal::ZERO).invert().value, Decimal::ZERO);
    }
}
