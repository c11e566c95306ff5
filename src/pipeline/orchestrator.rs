use std::time::Instant;

use chrono::Utc;
use futures::future::try_join_all;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;
use crate::errors::PentestError;
use crate::models::{AggregateReport, SuiteResult};
use crate::suites::{SuiteContext, SuiteSettings};
use crate::utils::truncation::truncate_error;
use super::events::OrchestratorEvent;
use super::metrics::{aggregate, RunTiming};
use super::registry::SuiteRegistry;
use super::state::{ExecutionMode, RunStatus};
use tracing::{error, info};

/// Runs the registered suites against one target and folds their results
/// into an [`AggregateReport`].
pub struct Orchestrator {
    registry: SuiteRegistry,
    settings: SuiteSettings,
    mode: ExecutionMode,
    status: RwLock<RunStatus>,
    event_tx: Option<mpsc::UnboundedSender<OrchestratorEvent>>,
}

impl Orchestrator {
    pub fn new(registry: SuiteRegistry, settings: SuiteSettings) -> Self {
        Self {
            registry,
            settings,
            mode: ExecutionMode::default(),
            status: RwLock::new(RunStatus::NotStarted),
            event_tx: None,
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach an event channel for streaming run progress to a console or other consumer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<OrchestratorEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub async fn status(&self) -> RunStatus {
        self.status.read().await.clone()
    }

    /// Construct and run every registered suite against `target_url`.
    ///
    /// The first suite error is returned unchanged: later suites are not
    /// constructed (sequential mode) and no report is produced.
    pub async fn run_all(&self, target_url: &str) -> Result<AggregateReport, PentestError> {
        let run_id = Uuid::new_v4().to_string();
        let ctx = SuiteContext::new(target_url, &self.settings);

        info!(
            run_id = %run_id,
            target = %target_url,
            suites = self.registry.len(),
            mode = %self.mode,
            "Run started"
        );
        self.emit(OrchestratorEvent::RunStarted {
            run_id: run_id.clone(),
            target_url: target_url.to_string(),
            suites: self.registry.names(),
            mode: self.mode,
        });

        let started_at = Utc::now();
        let clock = Instant::now();

        let results = match self.mode {
            ExecutionMode::Sequential => self.run_sequential(&ctx).await?,
            ExecutionMode::Concurrent => self.run_concurrent(&ctx).await?,
        };

        let timing = RunTiming {
            started_at,
            finished_at: Utc::now(),
            elapsed_seconds: clock.elapsed().as_secs_f64(),
        };
        let report = aggregate(run_id, target_url, timing, results);

        self.set_status(RunStatus::Completed).await;
        self.emit(OrchestratorEvent::RunCompleted {
            total_tests: report.total_tests,
            total_vulnerabilities: report.total_vulnerabilities,
            duration_seconds: report.total_duration_seconds,
        });
        info!(
            run_id = %report.run_id,
            tests = report.total_tests,
            passed = report.total_passed,
            failed = report.total_failed,
            vulnerabilities = report.total_vulnerabilities,
            duration_secs = format!("{:.2}", report.total_duration_seconds),
            "Run completed"
        );

        Ok(report)
    }

    async fn run_sequential(&self, ctx: &SuiteContext) -> Result<Vec<SuiteResult>, PentestError> {
        let mut results = Vec::with_capacity(self.registry.len());

        for (index, entry) in self.registry.iter().enumerate() {
            self.set_status(RunStatus::RunningSuite {
                index,
                name: entry.name().to_string(),
            }).await;
            self.emit(OrchestratorEvent::SuiteStarted {
                index,
                name: entry.name().to_string(),
            });
            info!(suite = entry.name(), position = index + 1, total = self.registry.len(), "Running suite");

            let outcome = match entry.build(ctx) {
                Ok(suite) => suite.run().await.and_then(|r| ensure_consistent(entry.name(), r)),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(result) => {
                    self.record_completed(index, entry.name(), &result);
                    results.push(result);
                }
                Err(e) => {
                    self.record_failed(index, entry.name(), &e).await;
                    return Err(e);
                }
            }
        }

        Ok(results)
    }

    async fn run_concurrent(&self, ctx: &SuiteContext) -> Result<Vec<SuiteResult>, PentestError> {
        let mut suites = Vec::with_capacity(self.registry.len());
        for (index, entry) in self.registry.iter().enumerate() {
            match entry.build(ctx) {
                Ok(suite) => suites.push((index, entry.name(), suite)),
                Err(e) => {
                    self.record_failed(index, entry.name(), &e).await;
                    return Err(e);
                }
            }
        }

        self.set_status(RunStatus::RunningConcurrently { count: suites.len() }).await;

        let runs = suites.iter().map(|(index, name, suite)| async move {
            self.emit(OrchestratorEvent::SuiteStarted {
                index: *index,
                name: name.to_string(),
            });
            match suite.run().await.and_then(|r| ensure_consistent(name, r)) {
                Ok(result) => {
                    self.record_completed(*index, name, &result);
                    Ok(result)
                }
                Err(e) => {
                    self.record_failed(*index, name, &e).await;
                    Err(e)
                }
            }
        });

        try_join_all(runs).await
    }

    fn record_completed(&self, index: usize, name: &str, result: &SuiteResult) {
        info!(
            suite = name,
            tests = result.test_count,
            passed = result.success_count,
            failed = result.failure_count,
            vulnerabilities = result.vulnerability_count(),
            "Suite completed"
        );
        self.emit(OrchestratorEvent::SuiteCompleted {
            index,
            name: name.to_string(),
            tests: result.test_count,
            passed: result.success_count,
            failed: result.failure_count,
            vulnerabilities: result.vulnerability_count(),
            duration_ms: result.duration_ms,
        });
    }

    async fn record_failed(&self, index: usize, name: &str, err: &PentestError) {
        error!(suite = name, error = %err, "Suite faulted, aborting run");
        self.set_status(RunStatus::Failed { suite: name.to_string() }).await;
        self.emit(OrchestratorEvent::SuiteFailed {
            index,
            name: name.to_string(),
            error: truncate_error(&err.to_string()),
        });
    }

    async fn set_status(&self, status: RunStatus) {
        *self.status.write().await = status;
    }

    /// Emit an event if an event channel is attached.
    fn emit(&self, event: OrchestratorEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }
}

/// A result whose counts do not add up cannot be folded into the report.
fn ensure_consistent(suite: &str, result: SuiteResult) -> Result<SuiteResult, PentestError> {
    if result.is_consistent() {
        Ok(result)
    } else {
        Err(PentestError::Suite {
            suite: suite.to_string(),
            message: format!(
                "inconsistent counts: {} tests, {} passed, {} failed",
                result.test_count, result.success_count, result.failure_count
            ),
        })
    }
}
