use async_trait::async_trait;
use serde_json::{json, Value};
use crate::errors::PentestError;
use crate::models::{Severity, SuiteResult, VulnCategory, Vulnerability};
use super::client::{ApiClient, Auth, ProbeResponse};
use super::context::SuiteContext;
use super::probes::{self, SQLI_PATH_PAYLOAD, UNKNOWN_ID};
use super::recorder::CheckRecorder;
use super::TestSuite;
use tracing::info;

const UPLOAD_PATH: &str = "/api/purchase-orders/upload";
const CLOUD_METADATA_URL: &str = "http://169.254.169.254/latest/meta-data/";
const LOCAL_FILE_URL: &str = "file:///etc/passwd";

/// Attacks the purchase-order upload and lookup routes, including the
/// server-side fetch of `documentUrl`.
pub struct PurchaseOrderSuite {
    client: ApiClient,
}

impl PurchaseOrderSuite {
    pub const NAME: &'static str = "Purchase Order";

    pub fn new(ctx: &SuiteContext) -> Result<Self, PentestError> {
        Ok(Self { client: ApiClient::new(ctx)? })
    }

    async fn check_unauthenticated_access(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let resp = self.client.get("/api/purchase-orders/1", Auth::None).await?;
        probes::expect_rejected(rec, "unauthenticated_read", "GET /api/purchase-orders/1", &resp, || {
            Vulnerability::new("Purchase order readable without authentication", Severity::High, VulnCategory::AccessControl)
                .described("Purchase order details are returned to callers without credentials.")
                .recommend("Require partner credentials on the lookup route.")
        });

        let body = json!({ "documentUrl": "https://example.com/purchase-order.pdf" });
        let resp = self.client.post_json(UPLOAD_PATH, &body, Auth::None).await?;
        probes::expect_rejected(rec, "unauthenticated_upload", &format!("POST {}", UPLOAD_PATH), &resp, || {
            Vulnerability::new("Purchase order upload without authentication", Severity::Critical, VulnCategory::AccessControl)
                .described("Anyone can trigger document analysis and storage.")
                .recommend("Require partner credentials on the upload route.")
        });
        Ok(())
    }

    async fn check_sql_injection(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let path = format!("/api/purchase-orders/{}", SQLI_PATH_PAYLOAD);
        let resp = self.client.get(&path, Auth::Configured).await?;
        probes::record_id_injection(rec, "sql_injection_in_purchase_order_id", &format!("GET {}", path), &resp);
        Ok(())
    }

    async fn upload(&self, body: &Value) -> Result<ProbeResponse, PentestError> {
        self.client.post_json(UPLOAD_PATH, body, Auth::Configured).await
    }

    async fn check_ssrf(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "ssrf_cloud_metadata_document_url";
        let resp = self.upload(&json!({ "documentUrl": CLOUD_METADATA_URL })).await?;
        if resp.is_success() {
            rec.vulnerable(
                check,
                Vulnerability::new("Server-side request forgery via documentUrl", Severity::High, VulnCategory::Ssrf)
                    .at(format!("POST {}", UPLOAD_PATH))
                    .described("The API fetched a link-local cloud metadata address supplied by the caller.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Allow-list document hosts and block private, loopback and link-local ranges."),
            );
        } else if resp.is_server_error() {
            rec.fail(check, format!("metadata documentUrl caused HTTP {}", resp.status));
        } else {
            rec.pass(check);
        }
        Ok(())
    }

    async fn check_local_file_url(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "local_file_document_url";
        let resp = self.upload(&json!({ "documentUrl": LOCAL_FILE_URL })).await?;
        if probes::leaks_file_contents(&resp.body) {
            rec.vulnerable(
                check,
                Vulnerability::new("Local file read via documentUrl", Severity::Critical, VulnCategory::Ssrf)
                    .at(format!("POST {}", UPLOAD_PATH))
                    .described("A file:// documentUrl returned the contents of a server file.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Only accept https document URLs."),
            );
        } else if resp.is_success() {
            rec.vulnerable(
                check,
                Vulnerability::new("Non-HTTP documentUrl scheme accepted", Severity::High, VulnCategory::Ssrf)
                    .at(format!("POST {}", UPLOAD_PATH))
                    .described("The upload accepted a file:// documentUrl.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Only accept https document URLs."),
            );
        } else if resp.is_server_error() {
            rec.fail(check, format!("file:// documentUrl caused HTTP {}", resp.status));
        } else {
            rec.pass(check);
        }
        Ok(())
    }

    async fn check_missing_document_url(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "missing_document_url";
        let resp = self.upload(&json!({})).await?;
        if resp.is_success() {
            rec.vulnerable(
                check,
                Vulnerability::new("Upload accepted without documentUrl", Severity::Low, VulnCategory::InputValidation)
                    .at(format!("POST {}", UPLOAD_PATH))
                    .described("Required input is not validated before processing starts.")
                    .with_evidence(probes::evidence(&resp))
                    .recommend("Validate the request body and answer 400 when documentUrl is missing."),
            );
        } else if resp.is_client_error() {
            rec.pass(check);
        } else {
            rec.fail(check, format!("missing documentUrl caused HTTP {}", resp.status));
        }
        Ok(())
    }

    async fn check_unknown_id(&self, rec: &mut CheckRecorder) -> Result<(), PentestError> {
        let check = "unknown_purchase_order_id";
        let resp = self.client
            .get(&format!("/api/purchase-orders/{}", UNKNOWN_ID), Auth::Configured)
            .await?;
        if resp.is_client_error() {
            rec.pass(check);
        } else {
            rec.fail(check, format!("unknown id answered HTTP {}", resp.status));
        }
        Ok(())
    }
}

#[async_trait]
impl TestSuite for PurchaseOrderSuite {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self) -> Result<SuiteResult, PentestError> {
        let mut rec = CheckRecorder::new(Self::NAME);

        self.check_unauthenticated_access(&mut rec).await?;

        if self.client.has_credentials() {
            self.check_sql_injection(&mut rec).await?;
            self.check_ssrf(&mut rec).await?;
            self.check_local_file_url(&mut rec).await?;
            self.check_missing_document_url(&mut rec).await?;
            self.check_unknown_id(&mut rec).await?;
        } else {
            info!(suite = Self::NAME, "No partner credentials configured, skipping authenticated checks");
        }

        Ok(rec.finish())
    }
}
