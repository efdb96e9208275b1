use crate::error::{CollaboratorResultExt, ExecutionError, RepositoryResultExt};
use crate::ports::{Router, SwapRequest};
use crate::repository::{OrderFilter, OrderRepository};
use lpm_domain::{Amount, Order, Price, Project};
use std::sync::Arc;

/// Input to [`OrderManager::new_order`].
pub struct NewOrder<'a> {
    /// Project whose wallet and pool the swap runs on.
    pub project: &'a Project,
    /// Most the wallet will pay.
    pub amount_in: Amount,
    /// Exact amount to receive.
    pub amount_out: Amount,
    /// Price the swap was planned at.
    pub price: Price,
}

/// Executes swaps and keeps their order records.
pub struct OrderManager {
    repo: Arc<OrderRepository>,
    router: Arc<dyn Router>,
}

impl OrderManager {
    /// Creates a manager over the order store and swap router.
    pub fn new(repo: Arc<OrderRepository>, router: Arc<dyn Router>) -> Self {
        Self { repo, router }
    }

    /// Executes a swap on the project's pool and records the fill.
    pub async fn new_order(&self, input: NewOrder<'_>) -> Result<Order, ExecutionError> {
        let project = input.project;
        let pool = &project.pool;
        let direction = Order::direction_for(pool, input.amount_in.token()).ok_or_else(|| {
            ExecutionError::InvalidInvestmentToken {
                token: input.amount_in.token().describe(),
                pair: pool.pair.to_string(),
            }
        })?;

        let fill = self
            .router
            .swap(&SwapRequest {
                network: pool.network.clone(),
                protocol: pool.protocol.clone(),
                pool_address: pool.address.clone(),
                fee: pool.fee,
                owner: project.wallet.address.clone(),
                amount_in: input.amount_in,
                amount_out: input.amount_out,
            })
            .await
            .collaborator("router: swap")?;

        let order = Order::new(
            project.id,
            pool.clone(),
            fill.address,
            direction,
            fill.amount_in,
            fill.amount_out,
            fill.filled_price,
            Amount::new(Arc::clone(&project.wallet.native_token), fill.transaction_fee),
        );
        self.repo
            .save(&order)
            .await
            .storage("save order in repo after create")?;
        Ok(order)
    }

    /// Orders matching `filter`.
    pub async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>, ExecutionError> {
        self.repo.find(filter).await.storage("find orders in repo")
    }
}
