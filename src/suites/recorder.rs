use std::time::Instant;

use crate::models::{CheckOutcome, CheckRecord, SuiteResult, Vulnerability};
use tracing::{debug, info};

/// Accumulates check outcomes while a suite runs and seals them into an
/// immutable [`SuiteResult`].
pub struct CheckRecorder {
    suite: String,
    checks: Vec<CheckRecord>,
    vulnerabilities: Vec<Vulnerability>,
    started: Instant,
}

impl CheckRecorder {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            checks: Vec::new(),
            vulnerabilities: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn pass(&mut self, check: &str) {
        debug!(suite = %self.suite, check, "Check passed");
        self.push(check, CheckOutcome::Passed);
    }

    pub fn fail(&mut self, check: &str, reason: impl Into<String>) {
        let reason = reason.into();
        info!(suite = %self.suite, check, reason = %reason, "Check failed");
        self.push(check, CheckOutcome::Failed { reason });
    }

    /// Record a failed check together with the vulnerability it exposed.
    pub fn vulnerable(&mut self, check: &str, mut vulnerability: Vulnerability) {
        vulnerability.check = check.to_string();
        info!(
            suite = %self.suite,
            check,
            severity = %vulnerability.severity,
            title = %vulnerability.title,
            endpoint = %vulnerability.endpoint,
            "Vulnerability found"
        );
        self.push(check, CheckOutcome::Vulnerable { title: vulnerability.title.clone() });
        self.vulnerabilities.push(vulnerability);
    }

    pub fn finish(self) -> SuiteResult {
        let duration_ms = self.started.elapsed().as_millis() as u64;
        SuiteResult::from_checks(self.suite, self.checks, self.vulnerabilities, duration_ms)
    }

    fn push(&mut self, check: &str, outcome: CheckOutcome) {
        self.checks.push(CheckRecord { name: check.to_string(), outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, VulnCategory};

    #[test]
    fn test_finish_keeps_invariant() {
        let mut rec = CheckRecorder::new("Authentication");
        rec.pass("missing_credentials");
        rec.fail("configured_credentials_accepted", "HTTP 401");
        rec.vulnerable(
            "brute_force_rate_limiting",
            Vulnerability::new("No rate limiting", Severity::Medium, VulnCategory::Authentication),
        );

        let result = rec.finish();
        assert_eq!(result.suite, "Authentication");
        assert_eq!(result.test_count, 3);
        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 2);
        assert_eq!(result.vulnerabilities.len(), 1);
        assert_eq!(result.vulnerabilities[0].check, "brute_force_rate_limiting");
        assert!(result.is_consistent());
    }

    #[test]
    fn test_empty_recorder() {
        let result = CheckRecorder::new("Invoice").finish();
        assert_eq!(result.test_count, 0);
        assert!(result.vulnerabilities.is_empty());
    }
}
