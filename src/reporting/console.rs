use console::style;
use crate::models::{AggregateReport, Severity, Vulnerability};
use crate::pipeline::ExecutionMode;
use crate::utils::formatting::{format_duration, format_seconds};

const RULE_WIDTH: usize = 70;

pub const DISCLAIMER: &str = "DISCLAIMER: This penetration test was performed in a controlled environment\n\
with proper authorization. Never test applications without permission.";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn render_banner(target_url: &str, mode: ExecutionMode) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        style("API FULL PENETRATION TESTING SUITE").cyan().bold(),
        style(format!("v{} ({})", version, git_hash)).dim()
    ));
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!("{}\n", style(format!("Target URL: {}", target_url)).yellow()));
    if mode == ExecutionMode::Concurrent {
        out.push_str(&format!("{}\n", style("Suites run concurrently").dim()));
    }
    out.push_str(&rule());
    out
}

pub fn render_suite_header(name: &str) -> String {
    format!("\n{}", style(format!("Running {} Tests...", name)).magenta())
}

/// One-line outcome of a finished suite.
pub fn render_suite_line(
    name: &str,
    tests: usize,
    passed: usize,
    failed: usize,
    vulnerabilities: usize,
    duration_ms: u64,
) -> String {
    let vuln_text = if vulnerabilities == 0 {
        style("no vulnerabilities".to_string()).green()
    } else {
        style(format!("{} vulnerabilities", vulnerabilities)).red()
    };
    format!(
        "  {} {}: {} tests, {} passed, {} failed, {} ({})",
        style("✓").green(),
        name,
        tests,
        passed,
        failed,
        vuln_text,
        format_duration(duration_ms),
    )
}

fn render_vulnerability(v: &Vulnerability) -> String {
    let tag = format!("[{}]", v.severity.as_str().to_uppercase());
    let tag = match v.severity {
        Severity::Critical | Severity::High => style(tag).red().bold(),
        Severity::Medium => style(tag).yellow(),
        Severity::Low | Severity::Info => style(tag).dim(),
    };
    if v.endpoint.is_empty() {
        format!("  {} {}", tag, v.title)
    } else {
        format!("  {} {} ({})", tag, v.title, v.endpoint)
    }
}

/// Final results block, including the vulnerability list and disclaimer.
pub fn render_summary(report: &AggregateReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!("{}\n", style("OVERALL PENETRATION TEST RESULTS").cyan().bold()));
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!("Total Duration: {} seconds\n", format_seconds(report.total_duration_seconds)));
    out.push_str(&format!("Tests Run: {}\n", report.total_tests));
    out.push_str(&format!("Passed: {}\n", report.total_passed));
    out.push_str(&format!("Failed: {}\n", report.total_failed));

    if report.total_vulnerabilities == 0 {
        out.push_str(&format!(
            "\n{}\n",
            style("No vulnerabilities found! The API appears to be secure.").green()
        ));
    } else {
        out.push_str(&format!(
            "\n{}\n",
            style(format!("Total Vulnerabilities Found: {}", report.total_vulnerabilities)).red().bold()
        ));

        let counts = report.severity_counts();
        let breakdown: Vec<String> = Severity::ALL
            .iter()
            .filter_map(|s| counts.get(s).map(|n| format!("{} {}", n, s)))
            .collect();
        out.push_str(&format!("  ({})\n", breakdown.join(", ")));

        let mut vulns: Vec<&Vulnerability> = report.vulnerabilities().collect();
        vulns.sort_by_key(|v| v.severity.rank());
        for v in vulns {
            out.push_str(&render_vulnerability(v));
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!("{}\n", style(DISCLAIMER).yellow()));
    out.push_str(&rule());
    out
}
