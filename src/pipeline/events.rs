use super::state::ExecutionMode;

/// Progress messages sent from the orchestrator to the console or any other consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    /// Run execution started
    RunStarted {
        run_id: String,
        target_url: String,
        suites: Vec<String>,
        mode: ExecutionMode,
    },
    /// A suite was constructed and is about to run
    SuiteStarted {
        index: usize,
        name: String,
    },
    /// A suite returned its result
    SuiteCompleted {
        index: usize,
        name: String,
        tests: usize,
        passed: usize,
        failed: usize,
        vulnerabilities: usize,
        duration_ms: u64,
    },
    /// A suite faulted; the run ends without a report
    SuiteFailed {
        index: usize,
        name: String,
        error: String,
    },
    /// All suites completed and the report is built
    RunCompleted {
        total_tests: usize,
        total_vulnerabilities: usize,
        duration_seconds: f64,
    },
}
