//! Per-project decision engine.
//!
//! One cycle: eligibility (gas, stop-loss), then either open a position
//! sized from the investment or check the open one and close it when the
//! price has left its range.

mod executor;
mod outcome;
mod sizing;
mod worth;

pub use executor::ProjectExecutor;
pub use outcome::CycleOutcome;
pub use sizing::{Feasibility, SizingReport, SwapPlan, can_be_opened, provisional_amounts};
pub use worth::position_worth;
