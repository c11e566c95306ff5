pub mod types;

pub use types::PentestError;
