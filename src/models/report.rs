use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::suite_result::SuiteResult;
use super::vulnerability::{Severity, Vulnerability};

/// Consolidated result of one orchestrator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub run_id: String,
    pub target_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Wall-clock time from the first suite start to the last suite completion.
    pub total_duration_seconds: f64,
    pub total_tests: usize,
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_vulnerabilities: usize,
    /// Per-suite breakdown in registration order.
    pub suites: Vec<SuiteResult>,
}

impl AggregateReport {
    pub fn is_consistent(&self) -> bool {
        self.total_tests == self.total_passed + self.total_failed
            && self.total_tests == self.suites.iter().map(|s| s.test_count).sum::<usize>()
            && self.total_vulnerabilities
                == self.suites.iter().map(|s| s.vulnerability_count()).sum::<usize>()
    }

    pub fn vulnerabilities(&self) -> impl Iterator<Item = &Vulnerability> {
        self.suites.iter().flat_map(|s| s.vulnerabilities.iter())
    }

    pub fn severity_counts(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for v in self.vulnerabilities() {
            *counts.entry(v.severity).or_insert(0) += 1;
        }
        counts
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteResult> {
        self.suites.iter().find(|s| s.suite == name)
    }
}
