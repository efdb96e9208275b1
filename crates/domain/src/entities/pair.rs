use crate::entities::token::Token;
use crate::enums::PairSide;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Ordered `(base, quote)` tokens. Prices are quoted as quote per base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub base: Arc<Token>,
    pub quote: Arc<Token>,
}

impl Pair {
    pub fn new(base: Arc<Token>, quote: Arc<Token>) -> Self {
        Self { base, quote }
    }

    /// Which side of the pair `token` is on, if any.
    pub fn side_of(&self, token: &Token) -> Option<PairSide> {
        if *self.base == *token {
            Some(PairSide::Base)
        } else if *self.quote == *token {
            Some(PairSide::Quote)
        } else {
            None
        }
    }

    pub fn token(&self, side: PairSide) -> &Arc<Token> {
        match side {
            PairSide::Base => &self.base,
            PairSide::Quote => &self.quote,
        }
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.side_of(token).is_some()
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base.ticker, self.quote.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of() {
        let weth = Arc::new(Token::new("ethereum", "0xc02a", "WETH", 18));
        let usdc = Arc::new(Token::new("ethereum", "0xa0b8", "USDC", 6));
        let dai = Token::new("ethereum", "0x6b17", "DAI", 18);
        let pair = Pair::new(weth.clone(), usdc.clone());

        assert_eq!(pair.side_of(&weth), Some(PairSide::Base));
        assert_eq!(pair.side_of(&usdc), Some(PairSide::Quote));
        assert_eq!(pair.side_of(&dai), None);
        assert_eq!(pair.token(PairSide::Quote), &usdc);
        assert_eq!(pair.to_string(), "WETH/USDC");
    }
}
