//! Wires the execution engine to a paper market and in-memory storage.

use crate::error::SimulationError;
use crate::market::{PaperMarket, PoolTick};
use lpm_data::MemoryStore;
use lpm_execution::config::RunnerConfig;
use lpm_execution::managers::{
    OrderManager, PoolManager, PositionManager, ProjectManager, RewardManager, WalletManager,
};
use lpm_execution::runner::{CycleReport, ProjectRunner};
use lpm_execution::strategy::ProjectExecutor;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// One simulated step: every project was evaluated, then the market moved.
#[derive(Debug)]
pub struct StepReport {
    pub step: u64,
    pub ticks: Vec<PoolTick>,
    pub cycle: CycleReport,
}

/// Counters over a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionTotals {
    pub steps: u64,
    pub evaluations: usize,
    pub failures: usize,
}

pub struct PaperSession {
    pub market: Arc<PaperMarket>,
    pub store: MemoryStore,
    pub pools: Arc<PoolManager>,
    pub positions: Arc<PositionManager>,
    pub projects: Arc<ProjectManager>,
    pub orders: Arc<OrderManager>,
    pub rewards: Arc<RewardManager>,
    pub wallets: Arc<WalletManager>,
    pub executor: Arc<ProjectExecutor>,
    pub runner: Arc<ProjectRunner>,
    totals: SessionTotals,
}

impl PaperSession {
    /// Wires a session over `market`. Fails when `config` does not validate.
    pub fn new(market: Arc<PaperMarket>, config: RunnerConfig) -> Result<Self, SimulationError> {
        let store = MemoryStore::new();

        let pools = Arc::new(PoolManager::new(store.pools(), market.clone()));
        let positions = Arc::new(PositionManager::new(store.positions(), market.clone()));
        let projects = Arc::new(ProjectManager::new(store.projects(), market.clone()));
        let orders = Arc::new(OrderManager::new(store.orders(), market.clone()));
        let rewards = Arc::new(RewardManager::new(store.rewards()));
        let wallets = Arc::new(WalletManager::new(store.wallets(), market.clone()));

        let executor = Arc::new(ProjectExecutor::new(
            pools.clone(),
            positions.clone(),
            projects.clone(),
            orders.clone(),
            rewards.clone(),
            market.clone(),
        ));
        let runner = Arc::new(ProjectRunner::new(
            config,
            executor.clone(),
            projects.clone(),
        )?);

        Ok(Self {
            market,
            store,
            pools,
            positions,
            projects,
            orders,
            rewards,
            wallets,
            executor,
            runner,
            totals: SessionTotals::default(),
        })
    }

    /// Evaluates every active project at the current prices, then moves the
    /// market one step.
    pub async fn step(&mut self) -> Result<StepReport, SimulationError> {
        let cycle = self.runner.run_cycle().await?;
        let ticks = self.market.advance().await?;

        self.totals.steps += 1;
        self.totals.evaluations += cycle.evaluated();
        self.totals.failures += cycle.failed();
        info!(
            step = self.totals.steps,
            evaluated = cycle.evaluated(),
            failed = cycle.failed(),
            "Step complete"
        );

        Ok(StepReport {
            step: self.totals.steps,
            ticks,
            cycle,
        })
    }

    pub fn totals(&self) -> &SessionTotals {
        &self.totals
    }
}
