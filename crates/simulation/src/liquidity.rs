use rust_decimal::Decimal;

/// Models the liquidity other providers keep in a pool.
pub trait LiquidityModel: Send + Sync {
    /// Active liquidity from other providers at `price`.
    fn get_liquidity_at_price(&self, price: Decimal) -> Decimal;
}

/// A simple model with constant external liquidity.
#[derive(Debug, Clone)]
pub struct ConstantLiquidity {
    pub liquidity: Decimal,
}

impl ConstantLiquidity {
    pub fn new(liquidity: Decimal) -> Self {
        Self { liquidity }
    }
}

impl LiquidityModel for ConstantLiquidity {
    fn get_liquidity_at_price(&self, _price: Decimal) -> Decimal {
        self.liquidity
    }
}
