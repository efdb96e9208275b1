use super::sizing::SizingReport;
use lpm_domain::{Amount, InactiveReason, Order, Position, Reward};
use serde::Serialize;

/// What one evaluation cycle did to a project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum CycleOutcome {
    /// The project was already inactive.
    Skipped,
    /// The project was deactivated this cycle.
    Deactivated {
        reason: InactiveReason,
        /// Present when sizing found the wallet underfunded.
        sizing: Option<SizingReport>,
    },
    Opened {
        position: Position,
        order: Option<Order>,
        sizing: SizingReport,
    },
    InRange {
        position: Position,
    },
    Closed {
        position: Position,
        rewards: Vec<Reward>,
        worth: Amount,
        transaction_fee: Amount,
    },
}

impl CycleOutcome {
    /// Short name used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Skipped => "skipped",
            CycleOutcome::Deactivated { .. } => "deactivated",
            CycleOutcome::Opened { .. } => "opened",
            CycleOutcome::InRange { .. } => "in-range",
            CycleOutcome::Closed { .. } => "closed",
        }
    }
}
