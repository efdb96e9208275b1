//! Execution-layer errors.

use lpm_domain::{AmountError, EntityError};
use thiserror::Error;

/// Failure reported by a persistence adapter.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Errors that abort a project cycle.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Monetary arithmetic failed. Token mismatches are fatal.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// An external collaborator call failed.
    #[error("{context}: {source}")]
    Collaborator {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("{context}: {source}")]
    Repository {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid investment token {token} for pair {pair}")]
    InvalidInvestmentToken { token: String, pair: String },

    #[error("investments not enough: required {required}, available {available}")]
    InvestmentsNotEnough { required: String, available: String },

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("position {0} is already closed")]
    PositionClosed(String),
}

impl ExecutionError {
    /// Fatal errors must halt the project instead of being retried.
    pub fn is_fatal(&self) -> bool {
        match self {
            ExecutionError::Amount(e) => e.is_invariant_violation(),
            _ => false,
        }
    }
}

impl From<EntityError> for ExecutionError {
    fn from(e: EntityError) -> Self {
        match e {
            EntityError::Amount(e) => ExecutionError::Amount(e),
            EntityError::PositionClosed(id) => ExecutionError::PositionClosed(id),
            EntityError::ForeignToken { token, pair } => {
                ExecutionError::Amount(AmountError::TokenMismatch {
                    op: "assign",
                    left: pair,
                    right: token,
                })
            }
        }
    }
}

/// Attaches call-site context to a collaborator failure.
pub(crate) trait CollaboratorResultExt<T> {
    fn collaborator(self, context: &'static str) -> Result<T, ExecutionError>;
}

impl<T> CollaboratorResultExt<T> for anyhow::Result<T> {
    fn collaborator(self, context: &'static str) -> Result<T, ExecutionError> {
        self.map_err(|source| ExecutionError::Collaborator { context, source })
    }
}

/// Attaches call-site context to a persistence failure.
pub(crate) trait RepositoryResultExt<T> {
    fn storage(self, context: &'static str) -> Result<T, ExecutionError>;
}

impl<T> RepositoryResultExt<T> for Result<T, RepositoryError> {
    fn storage(self, context: &'static str) -> Result<T, ExecutionError> {
        self.map_err(|source| ExecutionError::Repository { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_token_mismatch_is_fatal() {
        let mismatch = ExecutionError::from(AmountError::TokenMismatch {
            op: "add",
            left: "[a]".into(),
            right: "[b]".into(),
        });
        assert!(mismatch.is_fatal());
        assert!(!ExecutionError::from(AmountError::Overflow).is_fatal());
        assert!(!ExecutionError::NotFound("pool").is_fatal());
    }

    #[test]
    fn test_foreign_token_maps_to_fatal_mismatch() {
        let err = ExecutionError::from(EntityError::ForeignToken {
            token: "[ethereum, 0xdead, DAI]".into(),
            pair: "WETH/USDC".into(),
        });
        assert!(err.is_fatal());
    }

    #[test]
    fn test_collaborator_context_is_kept() {
        let res: anyhow::Result<()> = Err(anyhow::anyhow!("rpc timeout"));
        let err = res.collaborator("router: swap").unwrap_err();
        assert_eq!(err.to_string(), "router: swap: rpc timeout");
    }
}
