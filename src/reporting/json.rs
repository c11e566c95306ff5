use std::path::Path;

use crate::errors::PentestError;
use crate::models::AggregateReport;
use tracing::info;

/// Write the report as pretty JSON, creating parent directories as needed.
pub async fn write_json_report(path: &Path, report: &AggregateReport) -> Result<(), PentestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), vulnerabilities = report.total_vulnerabilities, "Wrote JSON report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, SuiteResult, VulnCategory, Vulnerability};
    use crate::pipeline::metrics::{aggregate, RunTiming};
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("nested").join("run.json");
        let now = Utc::now();
        let report = aggregate(
            "run-json".into(),
            "http://localhost:3000",
            RunTiming { started_at: now, finished_at: now, elapsed_seconds: 0.5 },
            vec![SuiteResult::from_counts(
                "Authentication",
                3,
                1,
                vec![Vulnerability::new("No rate limiting", Severity::Medium, VulnCategory::Authentication)],
            )],
        );

        write_json_report(&path, &report).await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let loaded: AggregateReport = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.run_id, "run-json");
        assert_eq!(loaded.total_tests, 4);
        assert_eq!(loaded.total_vulnerabilities, 1);
        assert_eq!(loaded.suites[0].vulnerabilities[0].title, "No rate limiting");

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["suites"][0]["vulnerabilities"][0]["severity"], "medium");
    }
}
