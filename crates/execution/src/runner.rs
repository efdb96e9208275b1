//! Outer scheduler: evaluates every active project once per cycle.

use crate::config::{ConfigError, RunnerConfig};
use crate::emergency::{BreakerConfig, ProjectBreaker};
use crate::error::ExecutionError;
use crate::lifecycle::LifecycleTracker;
use crate::managers::ProjectManager;
use crate::strategy::{CycleOutcome, ProjectExecutor};
use lpm_domain::ProjectId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinSet;
use tokio::time::interval;
use tracing::{error, info, warn};

/// Result of one project's evaluation within a cycle.
#[derive(Debug)]
pub struct ProjectReport {
    /// Project that was evaluated.
    pub project: ProjectId,
    /// Project name at the time of the evaluation.
    pub name: String,
    /// Outcome of the evaluation, or the error that stopped it.
    pub result: Result<CycleOutcome, ExecutionError>,
}

/// What one runner cycle did.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// One entry per project evaluated this cycle.
    pub reports: Vec<ProjectReport>,
    /// Projects whose breaker refused the cycle.
    pub blocked: usize,
    /// Projects skipped because an evaluation was already running.
    pub in_flight: usize,
}

impl CycleReport {
    /// Projects evaluated this cycle, failed ones included.
    pub fn evaluated(&self) -> usize {
        self.reports.len()
    }

    /// Projects whose evaluation returned an error.
    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.result.is_err()).count()
    }
}

/// Marks a project as being evaluated until dropped.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<ProjectId>>>,
    project: ProjectId,
}

impl InFlightGuard {
    /// `None` when the project is already being evaluated.
    fn acquire(set: &Arc<Mutex<HashSet<ProjectId>>>, project: ProjectId) -> Option<Self> {
        let mut projects = set.lock().ok()?;
        if !projects.insert(project) {
            return None;
        }
        Some(Self {
            set: Arc::clone(set),
            project,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut projects) = self.set.lock() {
            projects.remove(&self.project);
        }
    }
}

/// Drives [`ProjectExecutor`] over all active projects.
pub struct ProjectRunner {
    config: RunnerConfig,
    executor: Arc<ProjectExecutor>,
    projects: Arc<ProjectManager>,
    breaker: Arc<ProjectBreaker>,
    tracker: Arc<LifecycleTracker>,
    semaphore: Arc<Semaphore>,
    in_flight: Arc<Mutex<HashSet<ProjectId>>>,
    running: AtomicBool,
    shutdown: Notify,
}

impl ProjectRunner {
    /// Creates a runner. Fails when `config` does not validate.
    pub fn new(
        config: RunnerConfig,
        executor: Arc<ProjectExecutor>,
        projects: Arc<ProjectManager>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let breaker = ProjectBreaker::new(BreakerConfig::from(&config));
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_projects)),
            config,
            executor,
            projects,
            breaker: Arc::new(breaker),
            tracker: Arc::new(LifecycleTracker::new()),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
        })
    }

    /// Per-project circuit breaker.
    pub fn breaker(&self) -> &Arc<ProjectBreaker> {
        &self.breaker
    }

    /// Lifecycle events and summaries recorded so far.
    pub fn tracker(&self) -> &Arc<LifecycleTracker> {
        &self.tracker
    }

    /// True between [`start`](Self::start) and the loop exiting.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Loads active projects and evaluates each once.
    pub async fn run_cycle(&self) -> Result<CycleReport, ExecutionError> {
        let projects = self.projects.active().await?;
        let mut report = CycleReport::default();
        let mut tasks = JoinSet::new();

        for mut project in projects {
            if !self.breaker.is_allowed(project.id).await {
                report.blocked += 1;
                continue;
            }
            let Some(guard) = InFlightGuard::acquire(&self.in_flight, project.id) else {
                warn!(project = %project.id, "Evaluation already in flight, skipping");
                report.in_flight += 1;
                continue;
            };

            let executor = Arc::clone(&self.executor);
            let semaphore = Arc::clone(&self.semaphore);
            tasks.spawn(async move {
                let _guard = guard;
                let _permit = semaphore.acquire_owned().await;
                let result = executor.execute(&mut project).await;
                ProjectReport {
                    project: project.id,
                    name: project.name,
                    result,
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(project_report) => {
                    self.settle(&project_report).await;
                    report.reports.push(project_report);
                }
                Err(e) => error!(error = %e, "Project evaluation task aborted"),
            }
        }

        info!(
            evaluated = report.evaluated(),
            failed = report.failed(),
            blocked = report.blocked,
            in_flight = report.in_flight,
            "Cycle complete"
        );
        Ok(report)
    }

    async fn settle(&self, report: &ProjectReport) {
        match &report.result {
            Ok(outcome) => {
                self.tracker.record_outcome(report.project, outcome).await;
                self.breaker.record_success(report.project).await;
            }
            Err(e) => {
                error!(
                    project = %report.project,
                    name = %report.name,
                    error = %e,
                    fatal = e.is_fatal(),
                    "Project cycle failed"
                );
                self.tracker.record_failure(report.project, e).await;
                self.breaker.record_failure(report.project, e.is_fatal()).await;
            }
        }
    }

    /// Runs cycles on a fixed interval until [`stop`](Self::stop) is called.
    pub async fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        let mut ticker = interval(Duration::from_secs(self.config.eval_interval_secs));

        info!(
            interval_secs = self.config.eval_interval_secs,
            max_concurrent = self.config.max_concurrent_projects,
            "Starting project runner"
        );

        while self.running.load(Ordering::SeqCst) {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.shutdown.notified() => break,
            }
            if let Err(e) = self.run_cycle().await {
                error!(error = %e, "Failed to load projects");
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Project runner stopped");
    }

    /// Asks a running [`start`](Self::start) loop to exit.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emergency::BreakerState;
    use crate::testing::{Harness, StubMarket, base, native, quote};
    use lpm_domain::InactiveReason;
    use rust_decimal_macros::dec;

    fn projects(harness: &Harness) -> Arc<ProjectManager> {
        Arc::new(ProjectManager::new(
            harness.projects.clone(),
            harness.market.clone(),
        ))
    }

    fn runner(harness: &Harness, config: RunnerConfig) -> Arc<ProjectRunner> {
        Arc::new(
            ProjectRunner::new(config, harness.executor.clone(), projects(harness)).unwrap(),
        )
    }

    fn funded_market() -> StubMarket {
        let market = StubMarket::new(dec!(100), dec!(90), dec!(110));
        market.set_balance(&native(), dec!(1));
        market.set_balance(&base(), dec!(100));
        market.set_balance(&quote(), dec!(10000));
        market
    }

    #[tokio::test]
    async fn test_cycle_opens_and_tracks() {
        let harness = Harness::new(funded_market());
        let project = harness.project(dec!(10)).await;
        let runner = runner(&harness, RunnerConfig::default());

        let report = runner.run_cycle().await.unwrap();
        assert_eq!(report.evaluated(), 1);
        assert_eq!(report.failed(), 0);
        assert!(matches!(
            report.reports[0].result,
            Ok(CycleOutcome::Opened { .. })
        ));

        let summary = runner.tracker().get_summary(&project.id).await.unwrap();
        assert_eq!(summary.opens, 1);
        assert_eq!(summary.cycles, 1);
    }

    #[tokio::test]
    async fn test_deactivated_project_leaves_the_cycle() {
        let market = funded_market();
        market.set_balance(&native(), dec!(0));
        let harness = Harness::new(market);
        let project = harness.project(dec!(10)).await;
        let runner = runner(&harness, RunnerConfig::default());

        runner.run_cycle().await.unwrap();
        let summary = runner.tracker().get_summary(&project.id).await.unwrap();
        assert_eq!(summary.deactivation, Some(InactiveReason::NotEnoughGas));

        let report = runner.run_cycle().await.unwrap();
        assert_eq!(report.evaluated(), 0);
    }

    #[tokio::test]
    async fn test_repeated_failures_open_the_breaker() {
        let harness = Harness::new(funded_market());
        let project = harness.project(dec!(10)).await;
        harness
            .market
            .fail_swaps
            .store(true, std::sync::atomic::Ordering::SeqCst);
        // Base balance short of what the position needs forces a swap.
        harness.market.set_balance(&base(), dec!(4));

        let config = RunnerConfig {
            max_consecutive_failures: 2,
            ..RunnerConfig::default()
        };
        let runner = runner(&harness, config);

        runner.run_cycle().await.unwrap();
        runner.run_cycle().await.unwrap();
        assert_eq!(runner.breaker().state(project.id).await, BreakerState::Open);

        let report = runner.run_cycle().await.unwrap();
        assert_eq!(report.blocked, 1);
        assert_eq!(report.evaluated(), 0);

        let summary = runner.tracker().get_summary(&project.id).await.unwrap();
        assert_eq!(summary.failures, 2);
    }

    #[tokio::test]
    async fn test_project_in_flight_is_not_started_twice() {
        let harness = Harness::new(funded_market());
        harness.project(dec!(10)).await;
        harness
            .market
            .delay_ms
            .store(50, std::sync::atomic::Ordering::SeqCst);
        let runner = runner(&harness, RunnerConfig::default());

        let (first, second) = tokio::join!(runner.run_cycle(), runner.run_cycle());
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(first.evaluated() + second.evaluated(), 1);
        assert_eq!(first.in_flight + second.in_flight, 1);
    }

    #[tokio::test]
    async fn test_stop_ends_the_loop() {
        let harness = Harness::new(funded_market());
        let runner = runner(&harness, RunnerConfig::default());

        let handle = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.start().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(runner.is_running());

        runner.stop();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let harness = Harness::new(funded_market());
        harness.project(dec!(10)).await;

        let no_workers = RunnerConfig {
            max_concurrent_projects: 0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            ProjectRunner::new(no_workers, harness.executor.clone(), projects(&harness)),
            Err(ConfigError::InvalidValue(key, _)) if key == "LPM_MAX_CONCURRENT_PROJECTS"
        ));

        let no_interval = RunnerConfig {
            eval_interval_secs: 0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            ProjectRunner::new(no_interval, harness.executor.clone(), projects(&harness)),
            Err(ConfigError::InvalidValue(key, _)) if key == "LPM_EVAL_INTERVAL_SECS"
        ));
    }
}
