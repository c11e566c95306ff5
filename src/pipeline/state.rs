use serde::{Deserialize, Serialize};

/// How registered suites are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One suite at a time, in registration order.
    #[default]
    Sequential,
    /// All suites as independent futures; results keep registration order.
    Concurrent,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestrator lifecycle:
/// `NotStarted -> RunningSuite(0) -> .. -> RunningSuite(n-1) -> Completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    NotStarted,
    RunningSuite { index: usize, name: String },
    RunningConcurrently { count: usize },
    Completed,
    /// A suite faulted; the run was abandoned without a report.
    Failed { suite: String },
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_sequential() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: ExecutionMode = serde_yaml::from_str("concurrent").unwrap();
        assert_eq!(mode, ExecutionMode::Concurrent);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RunStatus::NotStarted.is_terminal());
        assert!(!RunStatus::RunningSuite { index: 0, name: "Authentication".into() }.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed { suite: "Invoice".into() }.is_terminal());
    }
}
