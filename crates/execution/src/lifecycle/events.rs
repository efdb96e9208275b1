//! Lifecycle events for project tracking.

use chrono::{DateTime, Utc};
use lpm_domain::{InactiveReason, OrderDirection, OrderId, PositionId, Price, ProjectId};
use serde::Serialize;
use uuid::Uuid;

/// Type of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEventType {
    /// A position was opened.
    PositionOpened,
    /// A swap was routed to fund a new position.
    Swapped,
    /// The open position was still in range.
    InRange,
    /// A position was closed and the project worth recomputed.
    PositionClosed,
    /// The project was deactivated.
    Deactivated,
    /// The cycle failed with an error.
    Failed,
}

/// A lifecycle event for a project.
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleEvent {
    /// Unique event id.
    pub id: Uuid,
    /// What happened.
    pub event_type: LifecycleEventType,
    /// Project the event belongs to.
    pub project: ProjectId,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Details for the event type.
    pub data: EventData,
}

impl LifecycleEvent {
    /// Creates an event stamped with a fresh id and the current time.
    pub fn new(event_type: LifecycleEventType, project: ProjectId, data: EventData) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            project,
            timestamp: Utc::now(),
            data,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventData {
    PositionOpened(PositionOpenedData),
    Swapped(SwapData),
    InRange(InRangeData),
    PositionClosed(PositionClosedData),
    Deactivated(DeactivatedData),
    Failed(FailureData),
}

/// Details of [`LifecycleEventType::PositionOpened`].
#[derive(Debug, Clone, Serialize)]
pub struct PositionOpenedData {
    /// New position.
    pub position: PositionId,
    /// Position address on the venue.
    pub address: String,
    /// Lower bound of the range.
    pub lower_price: Price,
    /// Upper bound of the range.
    pub upper_price: Price,
    /// Liquidity provided.
    pub liquidity: u128,
    /// Deposited amounts, rendered with their tickers.
    pub base: String,
    /// Quote amount deposited.
    pub quote: String,
}

/// Details of [`LifecycleEventType::Swapped`].
#[derive(Debug, Clone, Serialize)]
pub struct SwapData {
    /// Recorded order.
    pub order: OrderId,
    /// Swap direction.
    pub direction: OrderDirection,
    /// Amount paid, with ticker.
    pub amount_in: String,
    /// Amount received, with ticker.
    pub amount_out: String,
    /// Fill price.
    pub price: Price,
}

/// Details of [`LifecycleEventType::InRange`].
#[derive(Debug, Clone, Serialize)]
pub struct InRangeData {
    /// Open position.
    pub position: PositionId,
    /// Price observed this cycle.
    pub price: Price,
}

/// Details of [`LifecycleEventType::PositionClosed`].
#[derive(Debug, Clone, Serialize)]
pub struct PositionClosedData {
    /// Closed position.
    pub position: PositionId,
    /// Price at close.
    pub exit_price: Price,
    /// Project worth after the close, with ticker.
    pub worth: String,
    /// Rewards recorded for the position.
    pub rewards: usize,
    /// Withdrawal fee, with ticker.
    pub transaction_fee: String,
}

/// Details of [`LifecycleEventType::Deactivated`].
#[derive(Debug, Clone, Serialize)]
pub struct DeactivatedData {
    /// Why the project stopped.
    pub reason: InactiveReason,
}

/// Details of [`LifecycleEventType::Failed`].
#[derive(Debug, Clone, Serialize)]
pub struct FailureData {
    /// Rendered error.
    pub error: String,
    /// Whether the error halts the project.
    pub fatal: bool,
}
