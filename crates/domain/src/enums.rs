use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Inactive,
}

/// Why a project was deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InactiveReason {
    StopLoss,
    TakeProfit,
    NotEnoughFunds,
    NotEnoughGas,
}

impl InactiveReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InactiveReason::StopLoss => "stop-loss",
            InactiveReason::TakeProfit => "take-profit",
            InactiveReason::NotEnoughFunds => "not-enough-funds",
            InactiveReason::NotEnoughGas => "not-enough-gas",
        }
    }
}

impl fmt::Display for InactiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Direction of a swap relative to the pool's base token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderDirection {
    /// Quote token in, base token out.
    Buy,
    /// Base token in, quote token out.
    Sell,
}

/// Side of a trading pair a token sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairSide {
    Base,
    Quote,
}
