//! Circuit breaker keyed by project.

use crate::config::RunnerConfig;
use lpm_domain::ProjectId;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Breaker state for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakerState {
    /// Cycles run normally.
    Closed,
    /// Cycles are blocked until the recovery timeout passes.
    Open,
    /// One trial cycle is allowed.
    HalfOpen,
    /// A fatal error stopped the project. Never recovers.
    Halted,
}

/// Thresholds for [`ProjectBreaker`].
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failed cycles before the breaker opens.
    pub max_failures: u32,
    /// Time an open breaker waits before allowing a trial cycle.
    pub recovery_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: 3,
            recovery_timeout: Duration::from_secs(300),
        }
    }
}

impl From<&RunnerConfig> for BreakerConfig {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            max_failures: config.max_consecutive_failures,
            recovery_timeout: Duration::from_secs(config.recovery_timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    state: BreakerState,
    failures: u32,
    opened_at: Option<Instant>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            state: BreakerState::Closed,
            failures: 0,
            opened_at: None,
        }
    }
}

/// Breaker counts by state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakerStats {
    /// Projects running normally.
    pub closed: usize,
    /// Projects blocked until recovery.
    pub open: usize,
    /// Projects on a trial cycle.
    pub half_open: usize,
    /// Projects stopped by a fatal error.
    pub halted: usize,
}

/// Tracks failures per project and decides whether a project may run.
pub struct ProjectBreaker {
    config: BreakerConfig,
    entries: RwLock<HashMap<ProjectId, Entry>>,
}

impl ProjectBreaker {
    /// Creates a breaker with every project closed.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a cycle may run for `project`. An open breaker whose
    /// recovery timeout elapsed moves to half-open and allows one cycle.
    pub async fn is_allowed(&self, project: ProjectId) -> bool {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&project) else {
            return true;
        };

        match entry.state {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Halted => false,
            BreakerState::Open => {
                let recovered = entry
                    .opened_at
                    .is_some_and(|at| at.elapsed() >= self.config.recovery_timeout);
                if recovered {
                    entry.state = BreakerState::HalfOpen;
                    info!(project = %project, "Breaker half-open, allowing a trial cycle");
                }
                recovered
            }
        }
    }

    /// Records a successful cycle. Resets the failure count and closes a
    /// half-open breaker.
    pub async fn record_success(&self, project: ProjectId) {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&project) else {
            return;
        };

        entry.failures = 0;
        if entry.state == BreakerState::HalfOpen {
            entry.state = BreakerState::Closed;
            entry.opened_at = None;
            info!(project = %project, "Breaker closed after successful recovery");
        }
    }

    /// Records a failed cycle. Fatal failures halt the project.
    pub async fn record_failure(&self, project: ProjectId, fatal: bool) {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(project).or_default();

        if entry.state == BreakerState::Halted {
            return;
        }
        if fatal {
            entry.state = BreakerState::Halted;
            error!(project = %project, "Breaker halted project after fatal error");
            return;
        }

        entry.failures += 1;
        let trip = match entry.state {
            BreakerState::HalfOpen => true,
            BreakerState::Closed => entry.failures >= self.config.max_failures,
            BreakerState::Open | BreakerState::Halted => false,
        };
        if trip {
            warn!(
                project = %project,
                failures = entry.failures,
                "Breaker opened"
            );
            entry.state = BreakerState::Open;
            entry.opened_at = Some(Instant::now());
            entry.failures = 0;
        }
    }

    /// Current state for `project`; unknown projects are closed.
    pub async fn state(&self, project: ProjectId) -> BreakerState {
        self.entries
            .read()
            .await
            .get(&project)
            .map_or(BreakerState::Closed, |e| e.state)
    }

    /// Counts of tracked projects by state.
    pub async fn stats(&self) -> BreakerStats {
        let entries = self.entries.read().await;
        let mut stats = BreakerStats::default();
        for entry in entries.values() {
            match entry.state {
                BreakerState::Closed => stats.closed += 1,
                BreakerState::Open => stats.open += 1,
                BreakerState::HalfOpen => stats.half_open += 1,
                BreakerState::Halted => stats.halted += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(recovery_timeout: Duration) -> ProjectBreaker {
        ProjectBreaker::new(BreakerConfig {
            max_failures: 3,
            recovery_timeout,
        })
    }

    #[tokio::test]
    async fn test_opens_after_consecutive_failures() {
        let breaker = breaker(Duration::from_secs(300));
        let project = ProjectId::new();

        breaker.record_failure(project, false).await;
        breaker.record_failure(project, false).await;
        assert!(breaker.is_allowed(project).await);

        breaker.record_failure(project, false).await;
        assert_eq!(breaker.state(project).await, BreakerState::Open);
        assert!(!breaker.is_allowed(project).await);
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let breaker = breaker(Duration::from_secs(300));
        let project = ProjectId::new();

        breaker.record_failure(project, false).await;
        breaker.record_failure(project, false).await;
        breaker.record_success(project).await;
        breaker.record_failure(project, false).await;

        assert_eq!(breaker.state(project).await, BreakerState::Closed);
    }

    #[tokio::test]
    async fn test_recovers_through_half_open() {
        let breaker = breaker(Duration::ZERO);
        let project = ProjectId::new();

        for _ in 0..3 {
            breaker.record_failure(project, false).await;
        }
        assert!(breaker.is_allowed(project).await);
        assert_eq!(breaker.state(project).await, BreakerState::HalfOpen);

        breaker.record_success(project).await;
        assert_eq!(breaker.state(project).await, BreakerState::Closed);
    }

    #[tokio::test]
    async fn test_failure_while_half_open_reopens() {
        let breaker = breaker(Duration::ZERO);
        let project = ProjectId::new();

        for _ in 0..3 {
            breaker.record_failure(project, false).await;
        }
        assert!(breaker.is_allowed(project).await);
        breaker.record_failure(project, false).await;
        assert_eq!(breaker.state(project).await, BreakerState::Open);
    }

    #[tokio::test]
    async fn test_fatal_failure_halts_for_good() {
        let breaker = breaker(Duration::ZERO);
        let project = ProjectId::new();
        let other = ProjectId::new();

        breaker.record_failure(project, true).await;
        breaker.record_success(project).await;

        assert_eq!(breaker.state(project).await, BreakerState::Halted);
        assert!(!breaker.is_allowed(project).await);
        assert!(breaker.is_allowed(other).await);

        let stats = breaker.stats().await;
        assert_eq!(stats.halted, 1);
    }
}
