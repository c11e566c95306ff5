pub mod console;
pub mod json;
pub mod progress;

pub use console::{render_banner, render_summary, DISCLAIMER};
pub use json::write_json_report;
pub use progress::render_events;
