pub mod order;
pub mod pair;
pub mod pool;
pub mod position;
pub mod project;
pub mod reward;
pub mod token;
pub mod wallet;

// Re-export for easier access
pub use order::{Order, OrderId};
pub use pair::Pair;
pub use pool::{Pool, PoolKey};
pub use position::{Position, PositionId, PositionState};
pub use project::{Project, ProjectId};
pub use reward::{Reward, RewardId};
pub use token::Token;
pub use wallet::Wallet;
