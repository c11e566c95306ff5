pub mod events;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod state;

pub use events::OrchestratorEvent;
pub use orchestrator::Orchestrator;
pub use registry::SuiteRegistry;
pub use state::{ExecutionMode, RunStatus};
