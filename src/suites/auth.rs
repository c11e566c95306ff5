use async_trait::async_trait;
use uuid::Uuid;
use crate::config::credentials::redact_credentials;
use crate::errors::PentestError;
use crate::models::{Severity, SuiteResult, VulnCategory, Vulnerability};
use super::client::{ApiClient, Auth};
use super::context::SuiteContext;
use super::probes::{self, InjectionVerdict, SQLI_HEADER_PAYLOAD, UNKNOWN_ID};
use super::recorder::CheckRecorder;
use super::TestSuite;
use tracing::info;

const INVOICE_PROBE: &str = "/api/invoices/1";
const PURCHASE_ORDER_PROBE: &str = "/api/purchase-orders/1";

/// Probes the partner-credential layer that guards every API route.
pub struct AuthenticationSuite {
    client: ApiClient,
    rate_limit_attempts: u32,
}

impl AuthenticationSuite {
    pub const NAME: &'static str = "Authentication";

    pub fn new(ctx: &SuiteContext) -> Result<Self, PentestError> {
        Ok(Self {
            client: ApiClient::new(ctx)?,
            rate_limit_attempts: ctx.rate_limit_attempts.max(1),
        })
    }

    async fn check_missing_credentials(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        for (check, path) in [
            ("missing_credentials_invoices", INVOICE_PROBE),
            ("missing_credentials_purchase_orders", PURCHASE_ORDER_PROBE),
        ] {
            let resp = self.client.get(path, Auth::None).await?;
            probes::expect_rejected(rec, check, &format!("GET {}", path), &resp, || {
                Vulnerability::new("Protected resource reachable without credentials", Severity::High, VulnCategory::Authentication)
                    .described("The endpoint answered successfully although no client_id/client_secret headers were sent.")
                    .recommend("Apply the authentication middleware to every resource route.")
            });
        }
        Ok(())
    }

    async fn check_invalid_credentials(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let id = Uuid::new_v4().to_string();
        let secret = Uuid::new_v4().to_string();
        let resp = self.client
            .get(INVOICE_PROBE, Auth::Custom { client_id: &id, client_secret: &secret })
            .await?;
        probes::expect_rejected(rec, "invalid_credentials", &format!("GET {}", INVOICE_PROBE), &resp, || {
            Vulnerability::new("Random partner credentials accepted", Severity::Critical, VulnCategory::Authentication)
                .described("Freshly generated client credentials that cannot exist were accepted.")
                .recommend("Verify client_id and client_secret against the partner store before continuing.")
        });
        Ok(())
    }

    async fn check_sql_injection_in_credentials(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "sql_injection_in_credentials";
        let endpoint = format!("GET {}", INVOICE_PROBE);
        let resp = self.client
            .get(INVOICE_PROBE, Auth::Custom {
                client_id: SQLI_HEADER_PAYLOAD,
                client_secret: SQLI_HEADER_PAYLOAD,
            })
            .await?;

        match probes::classify_injection(&resp) {
            InjectionVerdict::Accepted => rec.vulnerable(
                check,
                Vulnerability::new("Authentication bypass via SQL injection", Severity::Critical, VulnCategory::Injection)
                    .at(&endpoint)
                    .described("A tautology payload in the credential headers was accepted as a valid partner.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Use parameterized queries for the credential lookup."),
            ),
            InjectionVerdict::LeaksErrors => {
                rec.vulnerable(check, probes::database_error_disclosure(&endpoint, &resp))
            }
            InjectionVerdict::ServerError => {
                rec.fail(check, format!("credential payload caused HTTP {}", resp.status))
            }
            InjectionVerdict::Handled if resp.is_rejection() => rec.pass(check),
            InjectionVerdict::Handled => rec.fail(
                check,
                format!("expected 401/403/429 for injected credentials, got HTTP {}", resp.status),
            ),
        }
        Ok(())
    }

    async fn check_empty_credentials(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let resp = self.client
            .get(INVOICE_PROBE, Auth::Custom { client_id: "", client_secret: "" })
            .await?;
        probes::expect_rejected(rec, "empty_credentials", &format!("GET {}", INVOICE_PROBE), &resp, || {
            Vulnerability::new("Empty credential headers accepted", Severity::High, VulnCategory::Authentication)
                .described("Present but empty client_id/client_secret headers were treated as valid.")
                .recommend("Reject blank credential values before the lookup.")
        });
        Ok(())
    }

    async fn check_credentials_in_query_string(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let (id, secret) = match self.client.credentials() {
            Some(creds) => (creds.client_id.clone(), creds.client_secret.clone()),
            None => ("pentest-client".to_string(), "pentest-secret".to_string()),
        };
        let query = [("client_id", id.as_str()), ("client_secret", secret.as_str())];
        let resp = self.client.get_with_query(INVOICE_PROBE, &query, Auth::None).await?;
        let endpoint = redact_credentials(
            &format!("GET {}?client_id={}&client_secret={}", INVOICE_PROBE, id, secret),
            &[&id, &secret],
        );
        probes::expect_rejected(rec, "credentials_in_query_string", &endpoint, &resp, || {
            Vulnerability::new("Credentials accepted from the query string", Severity::Medium, VulnCategory::Authentication)
                .described("Secrets in URLs end up in proxy logs, browser history and referrer headers.")
                .recommend("Only read partner credentials from request headers.")
        });
        Ok(())
    }

    async fn check_rate_limiting(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "brute_force_rate_limiting";
        let id = Uuid::new_v4().to_string();
        let mut last_status = 0;

        for attempt in 1..=self.rate_limit_attempts {
            let secret = Uuid::new_v4().to_string();
            let resp = self.client
                .get(INVOICE_PROBE, Auth::Custom { client_id: &id, client_secret: &secret })
                .await?;
            if resp.status == 429 {
                info!(attempt, "Rate limiting engaged");
                rec.pass(check);
                return Ok(());
            }
            last_status = resp.status;
        }

        rec.vulnerable(
            check,
            Vulnerability::new("No rate limiting on failed authentication", Severity::Medium, VulnCategory::Authentication)
                .at(format!("GET {}", INVOICE_PROBE))
                .described("Repeated failed credential attempts were never throttled, allowing secret brute forcing.")
                .with_evidence(format!(
                    "{} failed attempts, none answered with HTTP 429 (last status {})",
                    self.rate_limit_attempts, last_status
                ))
                .recommend("Throttle failed authentication attempts per client and source address."),
        );
        Ok(())
    }

    async fn check_configured_credentials(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "configured_credentials_accepted";
        let path = format!("/api/invoices/{}", UNKNOWN_ID);
        let resp = self.client.get(&path, Auth::Configured).await?;
        if resp.status == 401 || resp.status == 403 {
            rec.fail(check, format!("configured credentials were rejected with HTTP {}", resp.status));
        } else if resp.is_server_error() {
            rec.fail(check, format!("authenticated request caused HTTP {}", resp.status));
        } else {
            rec.pass(check);
        }
        Ok(())
    }
}

#[async_trait]
impl TestSuite for AuthenticationSuite {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self) -> Result<SuiteResult, PentestError> {
        let mut rec = CheckRecorder::new(Self::NAME);

        self.check_missing_credentials(&mut rec).await?;
        self.check_invalid_credentials(&mut rec).await?;
        self.check_sql_injection_in_credentials(&mut rec).await?;
        self.check_empty_credentials(&mut rec).await?;
        self.check_credentials_in_query_string(&mut rec).await?;

        if self.client.has_credentials() {
            self.check_configured_credentials(&mut rec).await?;
        } else {
            info!(suite = Self::NAME, "No partner credentials configured, skipping authenticated checks");
        }

        // Last, so the throttling it may trigger does not skew the checks above.
        self.check_rate_limiting(&mut rec).await?;

        Ok(rec.finish())
    }
}
