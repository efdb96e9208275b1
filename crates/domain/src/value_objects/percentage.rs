use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fraction expressed as a decimal (`0.01` is 1%).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Percent(pub Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn from_bps(bps: u32) -> Self {
        Self(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn to_bps(&self) -> u32 {
        (self.0 * Decimal::from(10000)).to_u32().unwrap_or(0)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `1 - self`.
    pub fn complement(&self) -> Decimal {
        Decimal::ONE - self.0
    }
}

impl From<Decimal> for Percent {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bps_conversion() {
        let fee = Percent::from_bps(30);
        assert_eq!(fee.value(), dec!(0.003));
        assert_eq!(fee.to_bps(), 30);
    }

    #[test]
    fn test_display() {
        assert_eq!(Percent::new(dec!(0.015)).to_string(), "1.5%");
    }
}
