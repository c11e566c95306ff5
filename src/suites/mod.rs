//! Test-suite collaborators driven by the orchestrator.
//!
//! Each suite is built from a [`SuiteContext`] bound to one target and
//! returns an immutable [`SuiteResult`] from [`TestSuite::run`]. Per-check
//! failures and vulnerabilities are data inside the result; an `Err` from
//! `run` is a fault that ends the whole orchestrator run.

pub mod auth;
pub mod client;
pub mod context;
pub mod invoice;
pub mod probes;
pub mod purchase_order;
pub mod recorder;

use async_trait::async_trait;
use crate::errors::PentestError;
use crate::models::SuiteResult;

pub use auth::AuthenticationSuite;
pub use context::{ClientCredentials, SuiteContext, SuiteSettings};
pub use invoice::InvoiceSuite;
pub use purchase_order::PurchaseOrderSuite;
pub use recorder::CheckRecorder;

#[async_trait]
pub trait TestSuite: Send + Sync {
    /// Display name used in headers, events and the report.
    fn name(&self) -> &str;

    /// Run every check of the suite to completion.
    async fn run(&self) -> Result<SuiteResult, PentestError>;
}
