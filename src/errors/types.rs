use thiserror::Error;

#[derive(Debug, Error)]
pub enum PentestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// A suite gave up on its run for a reason other than transport failure.
    #[error("Suite '{suite}' failed: {message}")]
    Suite { suite: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PentestError {
    /// Process exit status used by the binary when this error ends a run.
    pub fn exit_code(&self) -> i32 {
        match self {
            PentestError::Config(_) | PentestError::Yaml(_) => 2,
            PentestError::Network(_) | PentestError::Timeout(_) => 3,
            PentestError::InvalidTarget(_) => 5,
            _ => 1,
        }
    }

    pub(crate) fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PentestError::Timeout(format!("{}: {}", context, err))
        } else if err.is_builder() {
            PentestError::InvalidTarget(format!("{}: {}", context, err))
        } else {
            PentestError::Network(format!("{}: {}", context, err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(PentestError::Config("bad".into()).exit_code(), 2);
        assert_eq!(PentestError::Network("down".into()).exit_code(), 3);
        assert_eq!(PentestError::Timeout("slow".into()).exit_code(), 3);
        assert_eq!(PentestError::InvalidTarget("nope".into()).exit_code(), 5);
        let suite = PentestError::Suite { suite: "Invoice".into(), message: "bad counts".into() };
        assert_eq!(suite.exit_code(), 1);
    }

    #[test]
    fn test_suite_error_display() {
        let err = PentestError::Suite {
            suite: "Invoice".into(),
            message: "unexpected redirect loop".into(),
        };
        assert_eq!(err.to_string(), "Suite 'Invoice' failed: unexpected redirect loop");
    }
}
