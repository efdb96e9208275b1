//! Worth of a closed position in the project's investment token.

use lpm_domain::{Amount, AmountError, PairSide, Position, Reward, Token};
use std::sync::Arc;

/// Output amounts at the position's last price, plus its rewards.
///
/// Rewards in the other pool token are converted at the same price. Rewards
/// in a token outside the pool have no price and are counted at face value
/// in base units.
pub fn position_worth(
    investment_token: &Arc<Token>,
    position: &Position,
    rewards: &[Reward],
) -> Result<Amount, AmountError> {
    let price = position.current_price();
    let pair = &position.pool.pair;
    let out_base = position.out_base();
    let out_quote = position.out_quote();

    let side = pair.side_of(investment_token).ok_or_else(|| AmountError::TokenMismatch {
        op: "value",
        left: investment_token.describe(),
        right: pair.to_string(),
    })?;

    let in_worth_token = |amount: &Amount| -> Result<Amount, AmountError> {
        match (side, pair.side_of(amount.token())) {
            (PairSide::Base, Some(PairSide::Base)) | (PairSide::Quote, Some(PairSide::Quote)) => {
                Ok(Amount::new(Arc::clone(investment_token), amount.raw()))
            }
            (PairSide::Base, Some(PairSide::Quote)) => price.base_for(amount, investment_token),
            (PairSide::Quote, Some(PairSide::Base)) => price.quote_for(amount, investment_token),
            (_, None) => Ok(Amount::new(Arc::clone(investment_token), amount.raw())),
        }
    };

    let mut worth = Amount::zero(Arc::clone(investment_token));
    worth = worth.checked_add(&in_worth_token(out_base)?)?;
    worth = worth.checked_add(&in_worth_token(out_quote)?)?;

    let mut rewards_worth = Amount::zero(Arc::clone(investment_token));
    for reward in rewards {
        rewards_worth = rewards_worth.checked_add(&in_worth_token(&reward.amount)?)?;
    }

    worth.checked_add(&rewards_worth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lpm_domain::{Pair, Pool, PositionRange, PositionState, Price, ProjectId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn base() -> Arc<Token> {
        Arc::new(Token::new("ethereum", "0xbase", "BASE", 18))
    }

    fn quote() -> Arc<Token> {
        Arc::new(Token::new("ethereum", "0xquote", "QUOTE", 18))
    }

    fn h(token: Arc<Token>, v: Decimal) -> Amount {
        Amount::from_human(token, v).unwrap()
    }

    fn closed_position(out_base: Decimal, out_quote: Decimal, price: Decimal) -> Position {
        let pool = Pool::new(
            "ethereum",
            "uniswap-v3",
            "0xpool",
            Pool::MEDIUM_FEE,
            Pair::new(base(), quote()),
            Price::new(price),
        );
        let range = PositionRange::new(
            Price::new(price),
            Price::new(price / dec!(2)),
            Price::new(price * dec!(2)),
        );
        let mut position = Position::open(
            ProjectId::new(),
            pool,
            "0xposition",
            range,
            1,
            h(base(), dec!(1)),
            h(quote(), dec!(1)),
            Amount::zero(base()),
        )
        .unwrap();
        position
            .actualize(PositionState {
                price: Price::new(price),
                base: h(base(), out_base),
                quote: h(quote(), out_quote),
                base_accrued_fees: Amount::zero(base()),
                quote_accrued_fees: Amount::zero(quote()),
            })
            .unwrap();
        position
            .close(h(base(), out_base), h(quote(), out_quote), Utc::now())
            .unwrap();
        position
    }

    #[test]
    fn test_worth_in_base_with_quote_reward() {
        let position = closed_position(dec!(100), dec!(200), dec!(2.0));

        let before = position_worth(&base(), &position, &[]).unwrap();
        assert_eq!(before, h(base(), dec!(200)));

        let reward = Reward::new(position.id, h(quote(), dec!(50)));
        let after = position_worth(&base(), &position, &[reward]).unwrap();
        assert_eq!(after, h(base(), dec!(225)));
    }

    #[test]
    fn test_worth_in_quote() {
        let position = closed_position(dec!(100), dec!(200), dec!(2.0));
        let worth = position_worth(&quote(), &position, &[]).unwrap();
        assert_eq!(worth, h(quote(), dec!(400)));

        let reward = Reward::new(position.id, h(base(), dec!(5)));
        let worth = position_worth(&quote(), &position, &[reward]).unwrap();
        assert_eq!(worth, h(quote(), dec!(410)));
    }

    #[test]
    fn test_foreign_reward_counts_at_face_value() {
        let position = closed_position(dec!(100), dec!(200), dec!(2.0));
        let other = Arc::new(Token::new("ethereum", "0xother", "OTHER", 18));
        let reward = Reward::new(position.id, h(other, dec!(7)));
        let worth = position_worth(&base(), &position, &[reward]).unwrap();
        assert_eq!(worth, h(base(), dec!(207)));
    }

    #[test]
    fn test_investment_token_outside_pool_is_rejected() {
        let position = closed_position(dec!(100), dec!(200), dec!(2.0));
        let other = Arc::new(Token::new("ethereum", "0xother", "OTHER", 18));
        assert!(position_worth(&other, &position, &[]).is_err());
    }
}
