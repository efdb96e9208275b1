use crate::entities::position::PositionId;
use crate::value_objects::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardId(pub Uuid);

impl RewardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RewardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Incentive tokens collected from a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: RewardId,
    pub position_id: PositionId,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl Reward {
    pub fn new(position_id: PositionId, amount: Amount) -> Self {
        Self {
            id: RewardId::new(),
            position_id,
            amount,
            created_at: Utc::now(),
        }
    }
}
