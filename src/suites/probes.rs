//! Response checks shared by the suites.

use std::sync::LazyLock;

use regex::Regex;
use crate::models::{Severity, VulnCategory, Vulnerability};
use crate::utils::truncation::evidence_snippet;
use super::client::ProbeResponse;
use super::recorder::CheckRecorder;

/// `' OR '1'='1`, percent-encoded for use as a path segment.
pub const SQLI_PATH_PAYLOAD: &str = "1'%20OR%20'1'%3D'1";
/// Raw form of the same payload for header values.
pub const SQLI_HEADER_PAYLOAD: &str = "' OR '1'='1";
/// `../../../../etc/passwd` with encoded separators so it stays one segment.
pub const TRAVERSAL_PATH_PAYLOAD: &str = "..%2F..%2F..%2F..%2Fetc%2Fpasswd";
/// An id that cannot exist in the target's database.
pub const UNKNOWN_ID: &str = "00000000-0000-0000-0000-000000000000";

static SQL_ERROR_SIGNATURES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(sql syntax|ER_PARSE_ERROR|ER_BAD_FIELD_ERROR|SQLSTATE|sqlite_error|unterminated quoted string|pg_query|ORA-\d{5}|mysql_fetch)",
    )
    .expect("SQL error signature regex is valid")
});

static FILE_CONTENT_SIGNATURES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(root:[x*]?:0:0:|\[boot loader\]|daemon:[x*]?:1:1:)")
        .expect("file content signature regex is valid")
});

static STACK_TRACE_SIGNATURES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\bat \S+ \(\S+:\d+:\d+\)|node_modules/|Traceback \(most recent call last\)|\.rs:\d+:\d+)",
    )
    .expect("stack trace signature regex is valid")
});

pub fn leaks_sql_error(body: &str) -> bool {
    SQL_ERROR_SIGNATURES.is_match(body)
}

pub fn leaks_file_contents(body: &str) -> bool {
    FILE_CONTENT_SIGNATURES.is_match(body)
}

pub fn leaks_stack_trace(body: &str) -> bool {
    STACK_TRACE_SIGNATURES.is_match(body)
}

pub fn evidence(resp: &ProbeResponse) -> String {
    format!("HTTP {}: {}", resp.status, evidence_snippet(&resp.body))
}

/// How the target handled an injection payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionVerdict {
    /// The payload produced a successful response.
    Accepted,
    /// The response body carries database error details.
    LeaksErrors,
    /// The payload crashed the handler without leaking details.
    ServerError,
    /// Rejected or answered with a clean client error.
    Handled,
}

pub fn classify_injection(resp: &ProbeResponse) -> InjectionVerdict {
    if leaks_sql_error(&resp.body) {
        InjectionVerdict::LeaksErrors
    } else if resp.is_success() {
        InjectionVerdict::Accepted
    } else if resp.is_server_error() {
        InjectionVerdict::ServerError
    } else {
        InjectionVerdict::Handled
    }
}

/// The endpoint must turn the request away. A 2xx records `vulnerability`;
/// any other status is a plain failure.
pub fn expect_rejected(
    rec: &mut CheckRecorder,
    check: &str,
    endpoint: &str,
    resp: &ProbeResponse,
    vulnerability: impl FnOnce() -> Vulnerability,
) {
    if resp.is_rejection() {
        rec.pass(check);
    } else if resp.is_success() {
        rec.vulnerable(check, vulnerability().at(endpoint).with_evidence(evidence(resp)));
    } else {
        rec.fail(check, format!("expected 401/403/429 from {}, got HTTP {}", endpoint, resp.status));
    }
}

/// Record the outcome of an id-path injection probe.
pub fn record_id_injection(rec: &mut CheckRecorder, check: &str, endpoint: &str, resp: &ProbeResponse) {
    match classify_injection(resp) {
        InjectionVerdict::Handled => rec.pass(check),
        InjectionVerdict::Accepted => rec.vulnerable(
            check,
            Vulnerability::new("SQL injection payload accepted in resource id", Severity::High, VulnCategory::Injection)
                .at(endpoint)
                .described("A tautology payload in the id segment returned a successful response instead of a client error.")
                .with_evidence(evidence(resp))
                .recommend("Validate ids against the expected format and use parameterized queries."),
        ),
        InjectionVerdict::LeaksErrors => rec.vulnerable(
            check,
            database_error_disclosure(endpoint, resp),
        ),
        InjectionVerdict::ServerError => rec.fail(
            check,
            format!("injection payload caused HTTP {} at {}", resp.status, endpoint),
        ),
    }
}

pub fn database_error_disclosure(endpoint: &str, resp: &ProbeResponse) -> Vulnerability {
    Vulnerability::new("Database error details exposed", Severity::Medium, VulnCategory::InformationDisclosure)
        .at(endpoint)
        .described("The response contains raw database error text, which confirms injectable input and reveals the backend.")
        .with_evidence(evidence(resp))
        .recommend("Return generic error messages and log database errors server-side only.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u16, body: &str) -> ProbeResponse {
        ProbeResponse { status, body: body.to_string() }
    }

    #[test]
    fn test_sql_error_signatures() {
        assert!(leaks_sql_error("You have an error in your SQL syntax; check the manual"));
        assert!(leaks_sql_error("{\"code\":\"ER_PARSE_ERROR\"}"));
        assert!(!leaks_sql_error("{\"message\":\"Invoice not found\"}"));
    }

    #[test]
    fn test_file_content_signatures() {
        assert!(leaks_file_contents("root:x:0:0:root:/root:/bin/bash"));
        assert!(!leaks_file_contents("{\"message\":\"Not found\"}"));
    }

    #[test]
    fn test_stack_trace_signatures() {
        assert!(leaks_stack_trace("Error: Sentry error dummy!\n    at /app/src/routes/invoiceRoute.js:9:11\n    at Layer.handle (/app/node_modules/express/lib/router/layer.js:95:5)"));
        assert!(!leaks_stack_trace("{\"message\":\"Internal Server Error\"}"));
    }

    #[test]
    fn test_classify_injection() {
        assert_eq!(classify_injection(&resp(200, "[]")), InjectionVerdict::Accepted);
        assert_eq!(classify_injection(&resp(500, "ER_PARSE_ERROR near ''1''")), InjectionVerdict::LeaksErrors);
        assert_eq!(classify_injection(&resp(500, "Internal Server Error")), InjectionVerdict::ServerError);
        assert_eq!(classify_injection(&resp(400, "Invalid id")), InjectionVerdict::Handled);
        assert_eq!(classify_injection(&resp(401, "Unauthorized")), InjectionVerdict::Handled);
    }

    #[test]
    fn test_expect_rejected_outcomes() {
        let mut rec = CheckRecorder::new("Test");
        let vuln = || Vulnerability::new("open", Severity::High, VulnCategory::AccessControl);
        expect_rejected(&mut rec, "a", "GET /x", &resp(401, ""), vuln);
        expect_rejected(&mut rec, "b", "GET /x", &resp(200, "{}"), vuln);
        expect_rejected(&mut rec, "c", "GET /x", &resp(500, ""), vuln);
        let result = rec.finish();
        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 2);
        assert_eq!(result.vulnerabilities.len(), 1);
        assert_eq!(result.vulnerabilities[0].endpoint, "GET /x");
        assert!(result.vulnerabilities[0].evidence.starts_with("HTTP 200"));
    }
}
