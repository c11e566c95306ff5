use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PentestConfig {
    pub target: Option<TargetConfig>,
    pub scan: Option<ScanConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub url: Option<String>,
    /// Partner client id; `$VAR` reads it from the environment.
    pub client_id: Option<String>,
    /// Partner client secret; `$VAR` reads it from the environment.
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    pub parallel: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    pub rate_limit_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// JSON report destination.
    pub report_path: Option<String>,
}

impl PentestConfig {
    pub fn target_url(&self) -> Option<&str> {
        self.target.as_ref()?.url.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.target.as_ref()?.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.target.as_ref()?.client_secret.as_deref()
    }

    pub fn parallel(&self) -> Option<bool> {
        self.scan.as_ref()?.parallel
    }

    pub fn request_timeout_secs(&self) -> Option<u64> {
        self.scan.as_ref()?.request_timeout_secs
    }

    pub fn rate_limit_attempts(&self) -> Option<u32> {
        self.scan.as_ref()?.rate_limit_attempts
    }

    pub fn report_path(&self) -> Option<&str> {
        self.output.as_ref()?.report_path.as_deref()
    }
}
