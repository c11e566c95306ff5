use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};
use crate::cli::commands::Cli;
use crate::config::{self, credentials::resolve_credential, PentestConfig};
use crate::config::parser::{MAX_RATE_LIMIT_ATTEMPTS, MAX_REQUEST_TIMEOUT_SECS};
use crate::config::security::validate_header_value;
use crate::errors::PentestError;
use crate::pipeline::{ExecutionMode, Orchestrator, SuiteRegistry};
use crate::reporting::{self, render_banner, render_summary};
use crate::suites::context::{DEFAULT_RATE_LIMIT_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TARGET_URL};
use crate::suites::{ClientCredentials, SuiteSettings};

pub const CLIENT_ID_ENV: &str = "PENTEST_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "PENTEST_CLIENT_SECRET";

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target_url: String,
    pub settings: SuiteSettings,
    pub mode: ExecutionMode,
    pub report_path: Option<PathBuf>,
}

pub async fn handle_run(cli: Cli) -> Result<(), PentestError> {
    let file_config = match &cli.config {
        Some(path) => Some(config::parse_config(path).await?),
        None => None,
    };
    let run_config = build_run_config(&cli, file_config.as_ref())?;

    info!(
        target = %run_config.target_url,
        mode = %run_config.mode,
        authenticated = run_config.settings.credentials.is_some(),
        "Starting penetration test"
    );

    println!("{}", render_banner(&run_config.target_url, run_config.mode));

    let (tx, rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(reporting::render_events(rx, !cli.quiet));

    let orchestrator = Orchestrator::new(SuiteRegistry::standard(), run_config.settings.clone())
        .with_mode(run_config.mode)
        .with_event_channel(tx);
    let result = orchestrator.run_all(&run_config.target_url).await;

    // Dropping the orchestrator closes the channel so the renderer drains and exits
    drop(orchestrator);
    if let Err(e) = renderer.await {
        warn!(error = %e, "Progress renderer stopped unexpectedly");
    }

    let report = result?;
    println!("{}", render_summary(&report));

    if let Some(path) = &run_config.report_path {
        reporting::write_json_report(path, &report).await?;
        if !cli.quiet {
            println!("\nJSON report written to {}", path.display());
        }
    }

    info!(
        run_id = %report.run_id,
        total_tests = report.total_tests,
        vulnerabilities = report.total_vulnerabilities,
        duration_secs = report.total_duration_seconds,
        "Penetration test completed"
    );

    Ok(())
}

pub fn build_run_config(cli: &Cli, file_config: Option<&PentestConfig>) -> Result<RunConfig, PentestError> {
    build_run_config_with_env(cli, file_config, |key| std::env::var(key).ok())
}

/// Merge CLI flags, the config file and the environment. The first source
/// that sets a value wins, in that order, before the built-in defaults.
pub fn build_run_config_with_env<F>(
    cli: &Cli,
    file_config: Option<&PentestConfig>,
    env: F,
) -> Result<RunConfig, PentestError>
where
    F: Fn(&str) -> Option<String>,
{
    let target_url = cli.url.clone()
        .or_else(|| file_config.and_then(|c| c.target_url().map(str::to_string)))
        .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());
    let target_url = target_url.trim().trim_end_matches('/').to_string();
    if target_url.is_empty() {
        return Err(PentestError::InvalidTarget("target URL is empty".into()));
    }

    let client_id = cli.client_id.clone()
        .or_else(|| file_config.and_then(|c| c.client_id().map(resolve_credential)))
        .or_else(|| env(CLIENT_ID_ENV));
    let client_secret = cli.client_secret.clone()
        .or_else(|| file_config.and_then(|c| c.client_secret().map(resolve_credential)))
        .or_else(|| env(CLIENT_SECRET_ENV));

    if let Some(id) = &client_id {
        validate_header_value("client_id", id)?;
    }
    if let Some(secret) = &client_secret {
        validate_header_value("client_secret", secret)?;
    }

    let credentials = match (non_empty(client_id), non_empty(client_secret)) {
        (Some(id), Some(secret)) => Some(ClientCredentials::new(id, secret)),
        (None, None) => None,
        _ => {
            warn!("Only one of client id / client secret is set; authenticated checks will be skipped");
            None
        }
    };

    let timeout_secs = cli.timeout
        .or_else(|| file_config.and_then(|c| c.request_timeout_secs()))
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if timeout_secs == 0 || timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        return Err(PentestError::Config(format!(
            "Request timeout must be between 1 and {} seconds, got {}",
            MAX_REQUEST_TIMEOUT_SECS, timeout_secs
        )));
    }

    let rate_limit_attempts = cli.rate_limit_attempts
        .or_else(|| file_config.and_then(|c| c.rate_limit_attempts()))
        .unwrap_or(DEFAULT_RATE_LIMIT_ATTEMPTS);
    if rate_limit_attempts == 0 || rate_limit_attempts > MAX_RATE_LIMIT_ATTEMPTS {
        return Err(PentestError::Config(format!(
            "Rate limit attempts must be between 1 and {}, got {}",
            MAX_RATE_LIMIT_ATTEMPTS, rate_limit_attempts
        )));
    }

    let parallel = cli.parallel || file_config.and_then(|c| c.parallel()).unwrap_or(false);
    let mode = if parallel { ExecutionMode::Concurrent } else { ExecutionMode::Sequential };

    let report_path = cli.output.clone()
        .or_else(|| file_config.and_then(|c| c.report_path().map(PathBuf::from)));

    Ok(RunConfig {
        target_url,
        settings: SuiteSettings {
            credentials,
            request_timeout: Duration::from_secs(timeout_secs),
            rate_limit_attempts,
        },
        mode,
        report_path,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
