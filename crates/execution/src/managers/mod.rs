//! Entity managers: each binds one repository to the collaborators that
//! entity needs, and persists after every mutation.

mod order;
mod pool;
mod position;
mod project;
mod reward;
mod wallet;

pub use order::{NewOrder, OrderManager};
pub use pool::PoolManager;
pub use position::{OpenPosition, PositionManager};
pub use project::{NewProject, ProjectManager};
pub use reward::RewardManager;
pub use wallet::{NewWallet, WalletManager};
