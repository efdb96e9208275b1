use crate::value_objects::price::Price;
use serde::{Deserialize, Serialize};

/// Price bounds chosen for a new position, with the price they were
/// computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub initial_price: Price,
    pub lower_price: Price,
    pub upper_price: Price,
}

impl PositionRange {
    pub fn new(initial: Price, lower: Price, upper: Price) -> Self {
        Self {
            initial_price: initial,
            lower_price: lower,
            upper_price: upper,
        }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, price: Price) -> bool {
        price.value >= self.lower_price.value && price.value <= self.upper_price.value
    }
}
