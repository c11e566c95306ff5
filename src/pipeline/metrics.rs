use chrono::{DateTime, Utc};
use crate::models::{AggregateReport, SuiteResult};

/// Wall-clock bounds of one run.
#[derive(Debug, Clone, Copy)]
pub struct RunTiming {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Totals {
    tests: usize,
    passed: usize,
    failed: usize,
    vulnerabilities: usize,
}

impl Totals {
    fn add(self, suite: &SuiteResult) -> Self {
        Self {
            tests: self.tests + suite.test_count,
            passed: self.passed + suite.success_count,
            failed: self.failed + suite.failure_count,
            vulnerabilities: self.vulnerabilities + suite.vulnerability_count(),
        }
    }
}

/// Fold per-suite results into the run report. Suite order is preserved.
pub fn aggregate(
    run_id: String,
    target_url: &str,
    timing: RunTiming,
    suites: Vec<SuiteResult>,
) -> AggregateReport {
    let totals = suites.iter().fold(Totals::default(), Totals::add);

    AggregateReport {
        run_id,
        target_url: target_url.to_string(),
        started_at: timing.started_at,
        finished_at: timing.finished_at,
        total_duration_seconds: timing.elapsed_seconds.max(0.0),
        total_tests: totals.tests,
        total_passed: totals.passed,
        total_failed: totals.failed,
        total_vulnerabilities: totals.vulnerabilities,
        suites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, VulnCategory, Vulnerability};

    fn timing() -> RunTiming {
        let now = Utc::now();
        RunTiming { started_at: now, finished_at: now, elapsed_seconds: 0.25 }
    }

    fn vulns(titles: &[&str]) -> Vec<Vulnerability> {
        titles
            .iter()
            .map(|t| Vulnerability::new(*t, Severity::High, VulnCategory::Injection))
            .collect()
    }

    #[test]
    fn test_aggregate_mixed_results() {
        let suites = vec![
            SuiteResult::from_counts("Authentication", 8, 2, vulns(&["SQLi"])),
            SuiteResult::from_counts("Invoice", 4, 0, vec![]),
            SuiteResult::from_counts("Purchase Order", 3, 3, vulns(&["XSS", "Weak Auth"])),
        ];
        let report = aggregate("run-1".into(), "http://localhost:3000", timing(), suites);
        assert_eq!(report.total_tests, 20);
        assert_eq!(report.total_passed, 15);
        assert_eq!(report.total_failed, 5);
        assert_eq!(report.total_vulnerabilities, 3);
        assert_eq!(report.suites.len(), 3);
        assert_eq!(report.suites[1].suite, "Invoice");
        assert!(report.is_consistent());
    }

    #[test]
    fn test_aggregate_empty() {
        let report = aggregate("run-2".into(), "http://x", timing(), vec![]);
        assert_eq!(report.total_tests, 0);
        assert_eq!(report.total_vulnerabilities, 0);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_negative_elapsed_is_clamped() {
        let mut t = timing();
        t.elapsed_seconds = -1.0;
        let report = aggregate("run-3".into(), "http://x", t, vec![]);
        assert_eq!(report.total_duration_seconds, 0.0);
    }
}
