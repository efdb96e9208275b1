pub mod amount;
pub mod percentage;
pub mod price;
pub mod price_range;

pub use amount::{Amount, Operand};
pub use percentage::Percent;
pub use price::Price;
pub use price_range::PositionRange;
