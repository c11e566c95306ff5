pub mod vulnerability;
pub mod suite_result;
pub mod report;

pub use vulnerability::*;
pub use suite_result::*;
pub use report::*;
