use serde::{Deserialize, Serialize};

/// Severity level for a vulnerability, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3, Info = 4.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of weakness a vulnerability belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnCategory {
    Authentication,
    Injection,
    AccessControl,
    InformationDisclosure,
    Ssrf,
    InputValidation,
}

/// A security weakness recorded by a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub title: String,
    pub severity: Severity,
    pub category: VulnCategory,
    /// Method and path that exhibited the weakness, e.g. `GET /api/invoices/1`.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub recommendation: String,
    /// Name of the check that recorded this vulnerability.
    #[serde(default)]
    pub check: String,
}

impl Vulnerability {
    pub fn new(title: impl Into<String>, severity: Severity, category: VulnCategory) -> Self {
        Self {
            title: title.into(),
            severity,
            category,
            endpoint: String::new(),
            description: String::new(),
            evidence: String::new(),
            recommendation: String::new(),
            check: String::new(),
        }
    }

    pub fn at(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = evidence.into();
        self
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_ordering() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
    }

    #[test]
    fn test_category_serializes_screaming_snake() {
        let json = serde_json::to_string(&VulnCategory::InformationDisclosure).unwrap();
        assert_eq!(json, "\"INFORMATION_DISCLOSURE\"");
    }

    #[test]
    fn test_builder_fills_fields() {
        let v = Vulnerability::new("SQL injection", Severity::Critical, VulnCategory::Injection)
            .at("GET /api/invoices/1")
            .with_evidence("HTTP 200")
            .recommend("Use parameterized queries");
        assert_eq!(v.endpoint, "GET /api/invoices/1");
        assert_eq!(v.evidence, "HTTP 200");
        assert_eq!(v.recommendation, "Use parameterized queries");
        assert!(v.description.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let v: Vulnerability = serde_json::from_str(
            r#"{"title":"XSS","severity":"high","category":"INJECTION"}"#
        ).unwrap();
        assert_eq!(v.severity, Severity::High);
        assert!(v.check.is_empty());
    }
}
