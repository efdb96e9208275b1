//! Paper market errors.

use lpm_domain::AmountError;
use lpm_execution::config::ConfigError;
use lpm_execution::error::ExecutionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no pool listed for {0}")]
    UnknownPool(String),

    #[error("no position at {0}")]
    UnknownPosition(String),

    #[error("position {0} is closed")]
    PositionClosed(String),

    #[error("position {position} is not owned by {owner}")]
    NotOwner { position: String, owner: String },

    #[error("insufficient {token} balance: required {required}, available {available}")]
    InsufficientBalance {
        token: String,
        required: String,
        available: String,
    },

    #[error("swap needs {required} but at most {ceiling} was offered")]
    SlippageExceeded { required: String, ceiling: String },

    #[error("no native token registered for network {0}")]
    UnknownNetwork(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("liquidity math: {0}")]
    Math(&'static str),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
