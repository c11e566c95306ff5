use tracing::debug;

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Replace every occurrence of the given secrets with `[REDACTED]`.
/// Secrets shorter than 4 characters are left alone to avoid mangling text.
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_credential_literal() {
        assert_eq!(resolve_credential("partner-secret"), "partner-secret");
    }

    #[test]
    fn test_resolve_credential_env_var() {
        std::env::set_var("PENTEST_TEST_RESOLVE_CRED", "from-env");
        assert_eq!(resolve_credential("$PENTEST_TEST_RESOLVE_CRED"), "from-env");
        std::env::remove_var("PENTEST_TEST_RESOLVE_CRED");
    }

    #[test]
    fn test_resolve_credential_missing_env_var() {
        assert_eq!(resolve_credential("$PENTEST_NONEXISTENT_VAR"), "$PENTEST_NONEXISTENT_VAR");
    }

    #[test]
    fn test_redact_query_string() {
        let text = "GET /api/invoices/1?client_id=partner-a&client_secret=S3cret123";
        let redacted = redact_credentials(text, &["partner-a", "S3cret123"]);
        assert_eq!(redacted, "GET /api/invoices/1?client_id=[REDACTED]&client_secret=[REDACTED]");
    }

    #[test]
    fn test_redact_short_secret_ignored() {
        assert_eq!(redact_credentials("key=ab", &["ab"]), "key=ab");
    }
}
