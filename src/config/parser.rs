use std::path::Path;
use crate::errors::PentestError;
use super::types::PentestConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const MAX_RATE_LIMIT_ATTEMPTS: u32 = 1000;

pub async fn parse_config(path: &Path) -> Result<PentestConfig, PentestError> {
    if !path.exists() {
        return Err(PentestError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(PentestError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = parse_config_str(&content)?;
    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<PentestConfig, PentestError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty file parses to null
    if yaml.is_null() {
        return Ok(PentestConfig::default());
    }

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: PentestConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), PentestError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| PentestError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| PentestError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        // Advisory only; typed parsing and semantic checks are authoritative
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &PentestConfig) -> Result<(), PentestError> {
    if let Some(secs) = config.request_timeout_secs() {
        if secs == 0 || secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(PentestError::Config(format!(
                "scan.request_timeout_secs must be between 1 and {}, got {}",
                MAX_REQUEST_TIMEOUT_SECS, secs
            )));
        }
    }

    if let Some(attempts) = config.rate_limit_attempts() {
        if attempts == 0 || attempts > MAX_RATE_LIMIT_ATTEMPTS {
            return Err(PentestError::Config(format!(
                "scan.rate_limit_attempts must be between 1 and {}, got {}",
                MAX_RATE_LIMIT_ATTEMPTS, attempts
            )));
        }
    }

    if let Some(url) = config.target_url() {
        if url.trim().is_empty() {
            return Err(PentestError::Config("target.url must not be empty".into()));
        }
    }

    let has_id = config.client_id().map_or(false, |v| !v.is_empty());
    let has_secret = config.client_secret().map_or(false, |v| !v.is_empty());
    if has_id != has_secret {
        warn!("Only one of target.client_id / target.client_secret is set; authenticated checks will be skipped");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config_str(
            "target:\n  url: http://localhost:3000\n  client_id: partner\n  client_secret: s3cret\nscan:\n  parallel: false\n  request_timeout_secs: 15\n  rate_limit_attempts: 20\noutput:\n  report_path: reports/run.json\n",
        ).unwrap();
        assert_eq!(config.target_url(), Some("http://localhost:3000"));
        assert_eq!(config.request_timeout_secs(), Some(15));
        assert_eq!(config.rate_limit_attempts(), Some(20));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config_str("").unwrap();
        assert!(config.target.is_none());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_config_str("scan:\n  request_timeout_secs: 0\n").unwrap_err();
        assert!(matches!(err, PentestError::Config(_)));
    }

    #[test]
    fn test_excessive_rate_limit_attempts_rejected() {
        let err = parse_config_str("scan:\n  rate_limit_attempts: 5000\n").unwrap_err();
        assert!(matches!(err, PentestError::Config(_)));
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(parse_config_str("target:\n  url: '  '\n").is_err());
    }

    #[test]
    fn test_dangerous_value_rejected() {
        let err = parse_config_str("output:\n  report_path: ../../etc/cron.d/x\n").unwrap_err();
        assert!(matches!(err, PentestError::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config_str("llm:\n  provider: anthropic\n").unwrap_err();
        assert!(matches!(err, PentestError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/pentest.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
