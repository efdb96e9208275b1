//! Uniswap-v3 style liquidity math over human-unit prices and amounts.
//!
//! Token 0 is the pool base, token 1 the quote; prices are quote per base.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Square root of a strictly positive price.
pub fn sqrt_price(price: Decimal) -> Result<Decimal, &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be positive");
    }
    price.sqrt().ok_or("Square root failed")
}

/// Calculates the amount of token0 (x) given liquidity and a sqrt price range.
/// delta_x = L * (1/sqrt(P_a) - 1/sqrt(P_b))
pub fn get_amount0_delta(
    liquidity: Decimal,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
) -> Result<Decimal, &'static str> {
    if sqrt_price_a <= Decimal::ZERO || sqrt_price_b <= Decimal::ZERO {
        return Err("Sqrt price must be positive");
    }
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);

    let den = lower.checked_mul(upper).ok_or("Overflow")?;
    if den.is_zero() {
        return Err("Denominator zero");
    }
    let factor = (upper - lower) / den;
    liquidity.checked_mul(factor).ok_or("Overflow")
}

/// Calculates the amount of token1 (y) given liquidity and a sqrt price range.
/// delta_y = L * (sqrt(P_b) - sqrt(P_a))
pub fn get_amount1_delta(
    liquidity: Decimal,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
) -> Result<Decimal, &'static str> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    liquidity.checked_mul(upper - lower).ok_or("Overflow")
}

/// L = amount0 * (sqrt(P_a) * sqrt(P_b)) / (sqrt(P_b) - sqrt(P_a))
pub fn get_liquidity_for_amount0(
    amount0: Decimal,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
) -> Result<Decimal, &'static str> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    let den = upper - lower;
    if den.is_zero() {
        return Err("Range too small");
    }
    let num = amount0
        .checked_mul(lower)
        .and_then(|v| v.checked_mul(upper))
        .ok_or("Overflow")?;
    Ok(num / den)
}

/// L = amount1 / (sqrt(P_b) - sqrt(P_a))
pub fn get_liquidity_for_amount1(
    amount1: Decimal,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
) -> Result<Decimal, &'static str> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    let den = upper - lower;
    if den.is_zero() {
        return Err("Range too small");
    }
    amount1.checked_div(den).ok_or("Overflow")
}

/// Largest liquidity both amounts can fund at `price` within
/// `[lower, upper]`.
pub fn liquidity_for_amounts(
    amount0: Decimal,
    amount1: Decimal,
    price: Decimal,
    lower: Decimal,
    upper: Decimal,
) -> Result<Decimal, &'static str> {
    let (sqrt_a, sqrt_b) = sqrt_bounds(lower, upper)?;
    if price <= lower {
        get_liquidity_for_amount0(amount0, sqrt_a, sqrt_b)
    } else if price >= upper {
        get_liquidity_for_amount1(amount1, sqrt_a, sqrt_b)
    } else {
        let sqrt_p = sqrt_price(price)?;
        let l0 = get_liquidity_for_amount0(amount0, sqrt_p, sqrt_b)?;
        let l1 = get_liquidity_for_amount1(amount1, sqrt_a, sqrt_p)?;
        Ok(l0.min(l1))
    }
}

/// Token amounts held by `liquidity` at `price` within `[lower, upper]`.
pub fn amounts_for_liquidity(
    liquidity: Decimal,
    price: Decimal,
    lower: Decimal,
    upper: Decimal,
) -> Result<(Decimal, Decimal), &'static str> {
    let (sqrt_a, sqrt_b) = sqrt_bounds(lower, upper)?;
    if price <= lower {
        Ok((get_amount0_delta(liquidity, sqrt_a, sqrt_b)?, Decimal::ZERO))
    } else if price >= upper {
        Ok((Decimal::ZERO, get_amount1_delta(liquidity, sqrt_a, sqrt_b)?))
    } else {
        let sqrt_p = sqrt_price(price)?;
        Ok((
            get_amount0_delta(liquidity, sqrt_p, sqrt_b)?,
            get_amount1_delta(liquidity, sqrt_a, sqrt_p)?,
        ))
    }
}

fn sqrt_bounds(lower: Decimal, upper: Decimal) -> Result<(Decimal, Decimal), &'static str> {
    if upper <= lower {
        return Err("Upper bound must exceed lower bound");
    }
    Ok((sqrt_price(lower)?, sqrt_price(upper)?))
}

fn ordered(a: Decimal, b: Decimal) -> (Decimal, Decimal) {
    if a < b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn close_to(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.000001)
    }

    #[test]
    fn test_amount_deltas() {
        // Price goes from 1 to 4 (sqrt: 1 to 2)
        // delta_y = 1000 * (2 - 1) = 1000
        // delta_x = 1000 * (1/1 - 1/2) = 500
        let liquidity = dec!(1000);
        assert_eq!(get_amount1_delta(liquidity, dec!(1), dec!(2)).unwrap(), dec!(1000));
        assert_eq!(get_amount0_delta(liquidity, dec!(1), dec!(2)).unwrap(), dec!(500));
    }

    #[test]
    fn test_get_liquidity() {
        assert_eq!(get_liquidity_for_amount0(dec!(500), dec!(1), dec!(2)).unwrap(), dec!(1000));
        assert_eq!(get_liquidity_for_amount1(dec!(1000), dec!(1), dec!(2)).unwrap(), dec!(1000));
        assert!(get_liquidity_for_amount1(dec!(1), dec!(2), dec!(2)).is_err());
    }

    #[test]
    fn test_in_range_liquidity_and_back() {
        // sqrt bounds 9 and 11, sqrt price 10
        let l = liquidity_for_amounts(dec!(1), dec!(110), dec!(100), dec!(81), dec!(121)).unwrap();
        assert!(close_to(l, dec!(110)));

        let (x, y) = amounts_for_liquidity(l, dec!(100), dec!(81), dec!(121)).unwrap();
        assert!(close_to(x, dec!(1)));
        assert!(close_to(y, dec!(110)));
    }

    #[test]
    fn test_binding_side_limits_liquidity() {
        // Excess quote does not raise liquidity beyond what the base funds.
        let l = liquidity_for_amounts(dec!(1), dec!(500), dec!(100), dec!(81), dec!(121)).unwrap();
        assert!(close_to(l, dec!(110)));
    }

    #[test]
    fn test_out_of_range_is_single_sided() {
        let (x, y) = amounts_for_liquidity(dec!(110), dec!(70), dec!(81), dec!(121)).unwrap();
        assert!(x > Decimal::ZERO);
        assert_eq!(y, Decimal::ZERO);

        let (x, y) = amounts_for_liquidity(dec!(110), dec!(130), dec!(81), dec!(121)).unwrap();
        assert_eq!(x, Decimal::ZERO);
        assert!(close_to(y, dec!(220)));
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(amounts_for_liquidity(dec!(1), dec!(100), dec!(110), dec!(90)).is_err());
        assert!(sqrt_price(Decimal::ZERO).is_err());
    }
}
