//! In-crate doubles for repositories and collaborators.

use crate::error::RepositoryError;
use crate::managers::{
    OrderManager, PoolManager, PositionManager, ProjectManager, RewardManager,
};
use crate::ports::{
    AmountsRequest, BalanceProvider, DecreaseLiquidityReceipt, DecreaseLiquidityRequest,
    IncreaseLiquidityReceipt, IncreaseLiquidityRequest, LiquidityManager, LivePosition,
    PoolFactory, PoolState, PositionQuery, RangeRequest, Router, SizedAmounts, SwapFill,
    SwapRequest, WalletAddressGenerator,
};
use crate::repository::{Record, RecordFilter, Repository};
use crate::strategy::ProjectExecutor;
use async_trait::async_trait;
use lpm_domain::{
    Amount, Order, Pair, Percent, Pool, PoolKey, Position, PositionRange, PositionState, Price,
    Project, ProjectId, Reward, Token, Wallet,
};
use primitive_types::U256;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

pub struct VecRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T> VecRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T: Record> Repository<T> for VecRepository<T> {
    async fn find_one(&self, filter: &T::Filter) -> Result<Option<T>, RepositoryError> {
        Ok(self.items.read().await.iter().find(|i| filter.matches(i)).cloned())
    }

    async fn find(&self, filter: &T::Filter) -> Result<Vec<T>, RepositoryError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn save(&self, item: &T) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        let key = item.record_key();
        match items.iter_mut().find(|i| i.record_key() == key) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(())
    }
}

pub fn base() -> Arc<Token> {
    Arc::new(Token::new("testnet", "0xbase", "BASE", 18))
}

pub fn quote() -> Arc<Token> {
    Arc::new(Token::new("testnet", "0xquote", "QUOTE", 18))
}

pub fn native() -> Arc<Token> {
    Arc::new(Token::new("testnet", "0xnative", "GAS", 18))
}

pub fn human(token: Arc<Token>, value: Decimal) -> Amount {
    Amount::from_human(token, value).unwrap()
}

pub fn price(value: Decimal) -> Price {
    Price::new(value)
}

/// An open BASE/QUOTE position over 90..110 holding 5 BASE and 500 QUOTE.
pub fn open_position() -> Position {
    let pool = Pool::new(
        "testnet",
        "stub-v3",
        "0xpool",
        Pool::MEDIUM_FEE,
        Pair::new(base(), quote()),
        price(Decimal::from(100)),
    );
    let range = PositionRange::new(
        price(Decimal::from(100)),
        price(Decimal::from(90)),
        price(Decimal::from(110)),
    );
    Position::open(
        ProjectId::new(),
        pool,
        "0xposition",
        range,
        1_000,
        human(base(), Decimal::from(5)),
        human(quote(), Decimal::from(500)),
        Amount::zero(base()),
    )
    .unwrap()
}

/// Scripted market: fixed price and range, echoing sizing, explicit
/// balances and a settable live position state.
pub struct StubMarket {
    pub price: Mutex<Price>,
    pub range: Mutex<PositionRange>,
    pub balances: Mutex<HashMap<String, U256>>,
    pub live: Mutex<Option<PositionState>>,
    pub swaps: Mutex<Vec<SwapRequest>>,
    pub decreases: Mutex<Vec<DecreaseLiquidityRequest>>,
    pub fail_swaps: AtomicBool,
    /// Pool factory calls, in order.
    pub factory_calls: Mutex<Vec<&'static str>>,
    /// Latency added to balance lookups.
    pub delay_ms: AtomicU64,
}

impl StubMarket {
    pub fn new(last: Decimal, lower: Decimal, upper: Decimal) -> Self {
        Self {
            price: Mutex::new(price(last)),
            range: Mutex::new(PositionRange::new(price(last), price(lower), price(upper))),
            balances: Mutex::new(HashMap::new()),
            live: Mutex::new(None),
            swaps: Mutex::new(Vec::new()),
            decreases: Mutex::new(Vec::new()),
            fail_swaps: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            factory_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_balance(&self, token: &Token, human_value: Decimal) {
        let raw = token.to_base_value(human_value).unwrap();
        self.balances
            .lock()
            .unwrap()
            .insert(token.address.clone(), raw);
    }

    pub fn set_live(&self, state: PositionState) {
        *self.live.lock().unwrap() = Some(state);
    }

    fn pool_state(&self) -> PoolState {
        PoolState {
            address: "0xpool".to_string(),
            last_price: *self.price.lock().unwrap(),
            liquidity: 1_000_000,
        }
    }
}

#[async_trait]
impl PoolFactory for StubMarket {
    async fn find_pool(&self, _key: &PoolKey) -> anyhow::Result<PoolState> {
        self.factory_calls.lock().unwrap().push("find_pool");
        Ok(self.pool_state())
    }

    async fn get_pool(&self, _: &str, _: &str, _: &str) -> anyhow::Result<PoolState> {
        self.factory_calls.lock().unwrap().push("get_pool");
        Ok(self.pool_state())
    }

    async fn calculate_range(&self, _request: &RangeRequest) -> anyhow::Result<PositionRange> {
        Ok(*self.range.lock().unwrap())
    }

    async fn calculate_amounts(&self, request: &AmountsRequest) -> anyhow::Result<SizedAmounts> {
        Ok(SizedAmounts {
            liquidity: 1_000,
            base: request.base.clone(),
            quote: request.quote.clone(),
        })
    }
}

#[async_trait]
impl Router for StubMarket {
    async fn swap(&self, request: &SwapRequest) -> anyhow::Result<SwapFill> {
        if self.fail_swaps.load(Ordering::SeqCst) {
            anyhow::bail!("router unavailable");
        }
        self.swaps.lock().unwrap().push(request.clone());
        Ok(SwapFill {
            address: "0xswap".to_string(),
            amount_in: request.amount_in.clone(),
            amount_out: request.amount_out.clone(),
            filled_price: *self.price.lock().unwrap(),
            transaction_fee: U256::one(),
        })
    }
}

#[async_trait]
impl LiquidityManager for StubMarket {
    async fn increase_liquidity(
        &self,
        request: &IncreaseLiquidityRequest,
    ) -> anyhow::Result<IncreaseLiquidityReceipt> {
        Ok(IncreaseLiquidityReceipt {
            address: "0xposition".to_string(),
            liquidity: 1_000,
            base: request.base.clone(),
            quote: request.quote.clone(),
            transaction_fee: U256::one(),
        })
    }

    async fn decrease_liquidity(
        &self,
        request: &DecreaseLiquidityRequest,
    ) -> anyhow::Result<DecreaseLiquidityReceipt> {
        self.decreases.lock().unwrap().push(request.clone());
        Ok(DecreaseLiquidityReceipt {
            address: request.position_address.clone(),
            liquidity: request.liquidity,
            base: request.base_max.clone(),
            quote: request.quote_max.clone(),
            transaction_fee: U256::one(),
        })
    }

    async fn get_position(&self, _query: &PositionQuery) -> anyhow::Result<LivePosition> {
        let state = self
            .live
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no live position"))?;
        Ok(LivePosition {
            liquidity: 1_000,
            state,
        })
    }
}

#[async_trait]
impl WalletAddressGenerator for StubMarket {
    async fn generate(&self, network: &str, private_key: &str) -> anyhow::Result<String> {
        if private_key.is_empty() {
            anyhow::bail!("empty private key");
        }
        Ok(format!("0x{network}-{}", private_key.len()))
    }
}

#[async_trait]
impl BalanceProvider for StubMarket {
    async fn get(&self, _wallet: &Wallet, token: &Arc<Token>) -> anyhow::Result<Amount> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let raw = self
            .balances
            .lock()
            .unwrap()
            .get(&token.address)
            .copied()
            .unwrap_or_default();
        Ok(Amount::new(Arc::clone(token), raw))
    }
}

pub struct Harness {
    pub market: Arc<StubMarket>,
    pub projects: Arc<VecRepository<Project>>,
    pub positions: Arc<VecRepository<Position>>,
    pub orders: Arc<VecRepository<Order>>,
    pub rewards: Arc<VecRepository<Reward>>,
    pub pools: Arc<VecRepository<Pool>>,
    pub executor: Arc<ProjectExecutor>,
}

impl Harness {
    pub fn new(market: StubMarket) -> Self {
        let market = Arc::new(market);
        let projects = Arc::new(VecRepository::<Project>::new());
        let positions = Arc::new(VecRepository::<Position>::new());
        let orders = Arc::new(VecRepository::<Order>::new());
        let rewards = Arc::new(VecRepository::<Reward>::new());
        let pools = Arc::new(VecRepository::<Pool>::new());

        let executor = ProjectExecutor::new(
            Arc::new(PoolManager::new(pools.clone(), market.clone())),
            Arc::new(PositionManager::new(positions.clone(), market.clone())),
            Arc::new(ProjectManager::new(projects.clone(), market.clone())),
            Arc::new(OrderManager::new(orders.clone(), market.clone())),
            Arc::new(RewardManager::new(rewards.clone())),
            market.clone(),
        );

        Self {
            market,
            projects,
            positions,
            orders,
            rewards,
            pools,
            executor: Arc::new(executor),
        }
    }

    pub fn pool(&self) -> Pool {
        Pool::new(
            "testnet",
            "stub-v3",
            "0xpool",
            Pool::MEDIUM_FEE,
            Pair::new(base(), quote()),
            *self.market.price.lock().unwrap(),
        )
    }

    /// A project investing `investments` base tokens with a 10% stop loss
    /// and 1% slippage.
    pub async fn project(&self, investments: Decimal) -> Project {
        let wallet = Wallet::new("test", "testnet", "0xwallet", "key", native());
        let project = Project::new(
            wallet,
            self.pool(),
            "test project",
            human(base(), investments),
            Percent::new(Decimal::new(2, 1)),
            Percent::new(Decimal::new(1, 1)),
            Percent::new(Decimal::new(1, 1)),
            Percent::new(Decimal::new(1, 2)),
            1,
        );
        self.projects.save(&project).await.unwrap();
        project
    }
}
