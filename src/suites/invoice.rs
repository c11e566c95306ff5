use async_trait::async_trait;
use serde_json::json;
use crate::errors::PentestError;
use crate::models::{Severity, SuiteResult, VulnCategory, Vulnerability};
use super::client::{ApiClient, Auth};
use super::context::SuiteContext;
use super::probes::{self, SQLI_PATH_PAYLOAD, TRAVERSAL_PATH_PAYLOAD};
use super::recorder::CheckRecorder;
use super::TestSuite;
use tracing::info;

const OVERSIZED_ID_LEN: usize = 2048;

/// Attacks the invoice upload, lookup, status and delete routes.
pub struct InvoiceSuite {
    client: ApiClient,
}

impl InvoiceSuite {
    pub const NAME: &'static str = "Invoice";

    pub fn new(ctx: &SuiteContext) -> Result<Self, PentestError> {
        Ok(Self { client: ApiClient::new(ctx)? })
    }

    async fn check_unauthenticated_access(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let resp = self.client
            .post_json("/api/invoices/upload", &json!({}), Auth::None)
            .await?;
        probes::expect_rejected(rec, "unauthenticated_upload", "POST /api/invoices/upload", &resp, || {
            Vulnerability::new("Invoice upload without authentication", Severity::Critical, VulnCategory::AccessControl)
                .described("Anyone can submit documents for processing on behalf of a partner.")
                .recommend("Require partner credentials on the upload route.")
        });

        let resp = self.client.delete("/api/invoices/1", Auth::None).await?;
        probes::expect_rejected(rec, "unauthenticated_delete", "DELETE /api/invoices/1", &resp, || {
            Vulnerability::new("Invoice deletion without authentication", Severity::Critical, VulnCategory::AccessControl)
                .described("Invoices can be deleted without presenting credentials.")
                .recommend("Require partner credentials and ownership checks on delete.")
        });

        let resp = self.client.get("/api/invoices/1/status", Auth::None).await?;
        probes::expect_rejected(rec, "unauthenticated_status", "GET /api/invoices/1/status", &resp, || {
            Vulnerability::new("Invoice status readable without authentication", Severity::High, VulnCategory::AccessControl)
                .described("Processing status of arbitrary invoices is exposed to unauthenticated callers.")
                .recommend("Require partner credentials on the status route.")
        });
        Ok(())
    }

    async fn check_sql_injection(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let path = format!("/api/invoices/{}", SQLI_PATH_PAYLOAD);
        let resp = self.client.get(&path, Auth::Configured).await?;
        probes::record_id_injection(rec, "sql_injection_in_invoice_id", &format!("GET {}", path), &resp);
        Ok(())
    }

    async fn check_path_traversal(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "path_traversal_in_invoice_id";
        let path = format!("/api/invoices/{}", TRAVERSAL_PATH_PAYLOAD);
        let endpoint = format!("GET {}", path);
        let resp = self.client.get(&path, Auth::Configured).await?;

        if probes::leaks_file_contents(&resp.body) {
            rec.vulnerable(
                check,
                Vulnerability::new("Path traversal discloses server files", Severity::High, VulnCategory::InputValidation)
                    .at(&endpoint)
                    .described("A dot-dot payload in the invoice id returned the contents of a system file.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Never build filesystem paths from request input; look documents up by validated id."),
            );
        } else if resp.is_success() || resp.is_server_error() {
            rec.fail(check, format!("traversal payload returned HTTP {}", resp.status));
        } else {
            rec.pass(check);
        }
        Ok(())
    }

    async fn check_error_disclosure(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "error_stack_trace_disclosure";
        let resp = self.client.get("/api/invoices/debug-sentry", Auth::None).await?;
        if probes::leaks_stack_trace(&resp.body) {
            rec.vulnerable(
                check,
                Vulnerability::new("Stack trace exposed in error response", Severity::Medium, VulnCategory::InformationDisclosure)
                    .at("GET /api/invoices/debug-sentry")
                    .described("Unhandled errors return internal file paths and framework frames to the caller.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Install a terminal error handler that returns a generic body in production."),
            );
        } else {
            rec.pass(check);
        }
        Ok(())
    }

    async fn check_oversized_id(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "oversized_invoice_id";
        let path = format!("/api/invoices/{}", "9".repeat(OVERSIZED_ID_LEN));
        let resp = self.client.get(&path, Auth::Configured).await?;
        if resp.is_server_error() {
            rec.fail(check, format!("{}-character id caused HTTP {}", OVERSIZED_ID_LEN, resp.status));
        } else {
            rec.pass(check);
        }
        Ok(())
    }
}

#[async_trait]
impl TestSuite for InvoiceSuite {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self) -> Result<SuiteResult, PentestError> {
        let mut rec = CheckRecorder::new(Self::NAME);

        self.check_unauthenticated_access(&mut rec).await?;
        self.check_error_disclosure(&mut rec).await?;

        // Without credentials these requests stop at the auth layer and never reach a handler
        if self.client.has_credentials() {
            self.check_sql_injection(&mut rec).await?;
            self.check_path_traversal(&mut rec).await?;
            self.check_oversized_id(&mut rec).await?;
        } else {
            info!(suite = Self::NAME, "No partner credentials configured, skipping authenticated checks");
        }

        Ok(rec.finish())
    }
}
