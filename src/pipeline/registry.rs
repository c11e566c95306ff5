use crate::errors::PentestError;
use crate::suites::{
    AuthenticationSuite, InvoiceSuite, PurchaseOrderSuite, SuiteContext, TestSuite,
};

/// Builds a suite bound to the run's context.
pub type SuiteFactory =
    Box<dyn Fn(&SuiteContext) -> Result<Box<dyn TestSuite>, PentestError> + Send + Sync>;

pub struct RegisteredSuite {
    name: String,
    factory: SuiteFactory,
}

impl RegisteredSuite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(&self, ctx: &SuiteContext) -> Result<Box<dyn TestSuite>, PentestError> {
        (self.factory)(ctx)
    }
}

/// Ordered list of suites the orchestrator runs.
#[derive(Default)]
pub struct SuiteRegistry {
    suites: Vec<RegisteredSuite>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authentication, then Invoice, then Purchase Order.
    pub fn standard() -> Self {
        Self::new()
            .register(AuthenticationSuite::NAME, |ctx| {
                Ok(Box::new(AuthenticationSuite::new(ctx)?) as Box<dyn TestSuite>)
            })
            .register(InvoiceSuite::NAME, |ctx| {
                Ok(Box::new(InvoiceSuite::new(ctx)?) as Box<dyn TestSuite>)
            })
            .register(PurchaseOrderSuite::NAME, |ctx| {
                Ok(Box::new(PurchaseOrderSuite::new(ctx)?) as Box<dyn TestSuite>)
            })
    }

    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&SuiteContext) -> Result<Box<dyn TestSuite>, PentestError> + Send + Sync + 'static,
    {
        self.suites.push(RegisteredSuite {
            name: name.into(),
            factory: Box::new(factory),
        });
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.suites.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSuite> {
        self.suites.iter()
    }
}
