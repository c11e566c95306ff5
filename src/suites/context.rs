use std::time::Duration;

pub const DEFAULT_TARGET_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RATE_LIMIT_ATTEMPTS: u32 = 10;

/// Partner credentials the target API expects in the `client_id` and
/// `client_secret` request headers.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Run-wide knobs shared by every suite, independent of the target.
#[derive(Debug, Clone)]
pub struct SuiteSettings {
    pub credentials: Option<ClientCredentials>,
    pub request_timeout: Duration,
    /// Failed logins sent by the brute-force probe before expecting a 429.
    pub rate_limit_attempts: u32,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            credentials: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            rate_limit_attempts: DEFAULT_RATE_LIMIT_ATTEMPTS,
        }
    }
}

/// Everything a suite is constructed from: the target plus the run settings.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    pub target_url: String,
    pub credentials: Option<ClientCredentials>,
    pub request_timeout: Duration,
    pub rate_limit_attempts: u32,
}

impl SuiteContext {
    pub fn new(target_url: &str, settings: &SuiteSettings) -> Self {
        Self {
            target_url: target_url.to_string(),
            credentials: settings.credentials.clone(),
            request_timeout: settings.request_timeout,
            rate_limit_attempts: settings.rate_limit_attempts,
        }
    }

    pub fn for_target(target_url: &str) -> Self {
        Self::new(target_url, &SuiteSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ClientCredentials::new("partner-a", "hunter22");
        let out = format!("{:?}", creds);
        assert!(out.contains("partner-a"));
        assert!(!out.contains("hunter22"));
    }

    #[test]
    fn test_context_copies_settings() {
        let settings = SuiteSettings {
            credentials: Some(ClientCredentials::new("id", "secret")),
            request_timeout: Duration::from_secs(3),
            rate_limit_attempts: 4,
        };
        let ctx = SuiteContext::new("http://api.local", &settings);
        assert_eq!(ctx.target_url, "http://api.local");
        assert_eq!(ctx.request_timeout, Duration::from_secs(3));
        assert_eq!(ctx.rate_limit_attempts, 4);
        assert!(ctx.credentials.is_some());
    }

    #[test]
    fn test_default_settings() {
        let ctx = SuiteContext::for_target(DEFAULT_TARGET_URL);
        assert!(ctx.credentials.is_none());
        assert_eq!(ctx.request_timeout, Duration::from_secs(10));
        assert_eq!(ctx.rate_limit_attempts, 10);
    }
}
