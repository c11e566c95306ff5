use serde::{Deserialize, Serialize};
use super::vulnerability::Vulnerability;

/// Outcome of one check inside a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed { reason: String },
    /// The check failed and recorded a vulnerability.
    Vulnerable { title: String },
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub name: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// The immutable result of a single suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    /// Display name of the suite that produced this result.
    pub suite: String,
    /// Number of checks executed. Always `success_count + failure_count`.
    pub test_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub vulnerabilities: Vec<Vulnerability>,
    /// Per-check breakdown, empty when the result was built from bare counts.
    #[serde(default)]
    pub checks: Vec<CheckRecord>,
    /// Wall-clock duration of the suite run in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
}

impl SuiteResult {
    /// Build a result from bare counts. `test_count` is derived so the
    /// count invariant always holds.
    pub fn from_counts(
        suite: impl Into<String>,
        success_count: usize,
        failure_count: usize,
        vulnerabilities: Vec<Vulnerability>,
    ) -> Self {
        Self {
            suite: suite.into(),
            test_count: success_count + failure_count,
            success_count,
            failure_count,
            vulnerabilities,
            checks: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Build a result from recorded checks; counts are derived from them.
    pub fn from_checks(
        suite: impl Into<String>,
        checks: Vec<CheckRecord>,
        vulnerabilities: Vec<Vulnerability>,
        duration_ms: u64,
    ) -> Self {
        let success_count = checks.iter().filter(|c| c.outcome.is_success()).count();
        let failure_count = checks.len() - success_count;
        Self {
            suite: suite.into(),
            test_count: checks.len(),
            success_count,
            failure_count,
            vulnerabilities,
            checks,
            duration_ms,
        }
    }

    pub fn vulnerability_count(&self) -> usize {
        self.vulnerabilities.len()
    }

    pub fn is_consistent(&self) -> bool {
        self.test_count == self.success_count + self.failure_count
    }
}
