//! Lifecycle tracker for project history.

use super::{
    DeactivatedData, EventData, FailureData, InRangeData, LifecycleEvent, LifecycleEventType,
    PositionClosedData, PositionOpenedData, SwapData,
};
use crate::error::ExecutionError;
use crate::strategy::CycleOutcome;
use chrono::{DateTime, Utc};
use lpm_domain::{Amount, InactiveReason, ProjectId};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Running totals for one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    /// Tracked project.
    pub project: ProjectId,
    /// When the project was first recorded.
    pub first_seen: DateTime<Utc>,
    /// When the latest cycle was recorded.
    pub last_cycle: DateTime<Utc>,
    /// Evaluation cycles, failed ones included.
    pub cycles: u32,
    /// Positions opened.
    pub opens: u32,
    /// Positions closed.
    pub closes: u32,
    /// Swaps routed before opens.
    pub swaps: u32,
    /// Cycles that returned an error.
    pub failures: u32,
    /// Cycles that found the open position in range.
    pub in_range: u32,
    /// Worth after the most recent close.
    pub last_worth: Option<Amount>,
    /// Reason the project stopped, once it has.
    pub deactivation: Option<InactiveReason>,
}

impl ProjectSummary {
    fn new(project: ProjectId) -> Self {
        let now = Utc::now();
        Self {
            project,
            first_seen: now,
            last_cycle: now,
            cycles: 0,
            opens: 0,
            closes: 0,
            swaps: 0,
            failures: 0,
            in_range: 0,
            last_worth: None,
            deactivation: None,
        }
    }
}

/// Totals across all tracked projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    /// Tracked projects.
    pub projects: usize,
    /// Evaluation cycles.
    pub cycles: u32,
    /// Positions opened.
    pub opens: u32,
    /// Positions closed.
    pub closes: u32,
    /// Swaps routed.
    pub swaps: u32,
    /// Failed cycles.
    pub failures: u32,
    /// Projects that were deactivated.
    pub deactivated: usize,
}

/// Events kept per project by default.
pub const DEFAULT_EVENT_HISTORY: usize = 256;

/// Tracks lifecycle events for all projects.
///
/// Each project keeps at most `max_events` events; the oldest are dropped
/// first. Summaries count every cycle regardless.
pub struct LifecycleTracker {
    events: Arc<RwLock<HashMap<ProjectId, VecDeque<LifecycleEvent>>>>,
    summaries: Arc<RwLock<HashMap<ProjectId, ProjectSummary>>>,
    max_events: usize,
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::with_history(DEFAULT_EVENT_HISTORY)
    }
}

impl LifecycleTracker {
    /// A tracker keeping [`DEFAULT_EVENT_HISTORY`] events per project.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker keeping the last `max_events` events per project (at
    /// least one).
    #[must_use]
    pub fn with_history(max_events: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            summaries: Arc::new(RwLock::new(HashMap::new())),
            max_events: max_events.max(1),
        }
    }

    async fn push_events(&self, project: ProjectId, new_events: Vec<LifecycleEvent>) {
        if new_events.is_empty() {
            return;
        }
        let mut events = self.events.write().await;
        let history = events.entry(project).or_default();
        for event in new_events {
            if history.len() == self.max_events {
                history.pop_front();
            }
            history.push_back(event);
        }
    }

    /// Records the outcome of a successful cycle.
    pub async fn record_outcome(&self, project: ProjectId, outcome: &CycleOutcome) {
        let mut new_events = Vec::new();
        {
            let mut summaries = self.summaries.write().await;
            let summary = summaries
                .entry(project)
                .or_insert_with(|| ProjectSummary::new(project));
            summary.cycles += 1;
            summary.last_cycle = Utc::now();

            match outcome {
                CycleOutcome::Skipped => {
                    debug!(project = %project, "Cycle skipped, project inactive");
                }
                CycleOutcome::Deactivated { reason, .. } => {
                    summary.deactivation = Some(*reason);
                    new_events.push(LifecycleEvent::new(
                        LifecycleEventType::Deactivated,
                        project,
                        EventData::Deactivated(DeactivatedData { reason: *reason }),
                    ));
                    info!(project = %project, reason = %reason, "Project deactivated");
                }
                CycleOutcome::Opened {
                    position, order, ..
                } => {
                    if let Some(order) = order {
                        summary.swaps += 1;
                        new_events.push(LifecycleEvent::new(
                            LifecycleEventType::Swapped,
                            project,
                            EventData::Swapped(SwapData {
                                order: order.id,
                                direction: order.direction,
                                amount_in: order.amount_in.to_string(),
                                amount_out: order.amount_out.to_string(),
                                price: order.price,
                            }),
                        ));
                    }
                    summary.opens += 1;
                    new_events.push(LifecycleEvent::new(
                        LifecycleEventType::PositionOpened,
                        project,
                        EventData::PositionOpened(PositionOpenedData {
                            position: position.id,
                            address: position.address.clone(),
                            lower_price: position.lower_price(),
                            upper_price: position.upper_price(),
                            liquidity: position.liquidity,
                            base: position.in_base.to_string(),
                            quote: position.in_quote.to_string(),
                        }),
                    ));
                    info!(
                        project = %project,
                        position = %position.id,
                        lower = %position.lower_price(),
                        upper = %position.upper_price(),
                        swapped = order.is_some(),
                        "Position opened"
                    );
                }
                CycleOutcome::InRange { position } => {
                    summary.in_range += 1;
                    new_events.push(LifecycleEvent::new(
                        LifecycleEventType::InRange,
                        project,
                        EventData::InRange(InRangeData {
                            position: position.id,
                            price: position.current_price(),
                        }),
                    ));
                    debug!(
                        project = %project,
                        position = %position.id,
                        price = %position.current_price(),
                        "Position in range"
                    );
                }
                CycleOutcome::Closed {
                    position,
                    rewards,
                    worth,
                    transaction_fee,
                } => {
                    summary.closes += 1;
                    summary.last_worth = Some(worth.clone());
                    new_events.push(LifecycleEvent::new(
                        LifecycleEventType::PositionClosed,
                        project,
                        EventData::PositionClosed(PositionClosedData {
                            position: position.id,
                            exit_price: position.current_price(),
                            worth: worth.to_string(),
                            rewards: rewards.len(),
                            transaction_fee: transaction_fee.to_string(),
                        }),
                    ));
                    info!(
                        project = %project,
                        position = %position.id,
                        worth = %worth,
                        "Position closed"
                    );
                }
            }
        }

        self.push_events(project, new_events).await;
    }

    /// Records a failed cycle.
    pub async fn record_failure(&self, project: ProjectId, error: &ExecutionError) {
        {
            let mut summaries = self.summaries.write().await;
            let summary = summaries
                .entry(project)
                .or_insert_with(|| ProjectSummary::new(project));
            summary.cycles += 1;
            summary.failures += 1;
            summary.last_cycle = Utc::now();
        }

        let event = LifecycleEvent::new(
            LifecycleEventType::Failed,
            project,
            EventData::Failed(FailureData {
                error: error.to_string(),
                fatal: error.is_fatal(),
            }),
        );
        self.push_events(project, vec![event]).await;
    }

    /// Retained events for `project`, oldest first.
    pub async fn get_events(&self, project: &ProjectId) -> Vec<LifecycleEvent> {
        self.events
            .read()
            .await
            .get(project)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Totals for `project`, if it was ever recorded.
    pub async fn get_summary(&self, project: &ProjectId) -> Option<ProjectSummary> {
        self.summaries.read().await.get(project).cloned()
    }

    /// Totals for every tracked project.
    pub async fn get_all_summaries(&self) -> Vec<ProjectSummary> {
        self.summaries.read().await.values().cloned().collect()
    }

    /// Totals summed across projects.
    pub async fn get_aggregate_stats(&self) -> AggregateStats {
        let summaries = self.summaries.read().await;
        summaries
            .values()
            .fold(AggregateStats::default(), |mut stats, s| {
                stats.projects += 1;
                stats.cycles += s.cycles;
                stats.opens += s.opens;
                stats.closes += s.closes;
                stats.swaps += s.swaps;
                stats.failures += s.failures;
                if s.deactivation.is_some() {
                    stats.deactivated += 1;
                }
                stats
            })
    }
}
