use thiserror::Error;

/// Errors raised by [`crate::Amount`] arithmetic and token conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Two amounts of different tokens were combined.
    #[error("cannot {op} amounts of different tokens: {left} <> {right}")]
    TokenMismatch {
        op: &'static str,
        left: String,
        right: String,
    },
    #[error("amount overflow")]
    Overflow,
    #[error("amount underflow: {minuend} - {subtrahend}")]
    Underflow { minuend: String, subtrahend: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("negative operand: {0}")]
    NegativeOperand(String),
    #[error("token {ticker} has unsupported decimals: {decimals}")]
    UnsupportedDecimals { ticker: String, decimals: u8 },
}

impl AmountError {
    /// Returns true for contract violations that must abort the caller.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, AmountError::TokenMismatch { .. })
    }
}

/// Errors raised by entity mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("position {0} is already closed")]
    PositionClosed(String),
    #[error("token {token} does not belong to pair {pair}")]
    ForeignToken { token: String, pair: String },
    #[error(transparent)]
    Amount(#[from] AmountError),
}
