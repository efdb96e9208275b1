use crate::entities::pool::Pool;
use crate::entities::project::ProjectId;
use crate::entities::token::Token;
use crate::enums::{OrderDirection, PairSide};
use crate::value_objects::{amount::Amount, price::Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An executed swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub project_id: ProjectId,
    pub pool: Pool,
    /// Transaction hash or venue reference.
    pub address: String,
    pub direction: OrderDirection,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub price: Price,
    pub transaction_fee: Amount,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_id: ProjectId,
        pool: Pool,
        address: impl Into<String>,
        direction: OrderDirection,
        amount_in: Amount,
        amount_out: Amount,
        price: Price,
        transaction_fee: Amount,
    ) -> Self {
        Self {
            id: OrderId::new(),
            project_id,
            pool,
            address: address.into(),
            direction,
            amount_in,
            amount_out,
            price,
            transaction_fee,
            created_at: Utc::now(),
        }
    }

    /// Paying with the quote token buys the base token.
    pub fn direction_for(pool: &Pool, token_in: &Token) -> Option<OrderDirection> {
        match pool.pair.side_of(token_in)? {
            PairSide::Quote => Some(OrderDirection::Buy),
            PairSide::Base => Some(OrderDirection::Sell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pair::Pair;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_direction_for() {
        let weth = Arc::new(Token::new("ethereum", "0xc02a", "WETH", 18));
        let usdc = Arc::new(Token::new("ethereum", "0xa0b8", "USDC", 6));
        let dai = Token::new("ethereum", "0x6b17", "DAI", 18);
        let pool = Pool::new(
            "ethereum",
            "uniswap-v3",
            "0x88e6",
            Pool::LOW_FEE,
            Pair::new(weth.clone(), usdc.clone()),
            Price::new(dec!(2000)),
        );

        assert_eq!(Order::direction_for(&pool, &usdc), Some(OrderDirection::Buy));
        assert_eq!(Order::direction_for(&pool, &weth), Some(OrderDirection::Sell));
        assert_eq!(Order::direction_for(&pool, &dai), None);
    }
}
