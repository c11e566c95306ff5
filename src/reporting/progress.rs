use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use console::style;
use tokio::sync::mpsc;
use crate::pipeline::OrchestratorEvent;
use super::console::{render_suite_header, render_suite_line};

/// Renders orchestrator events as suite headers, spinners and per-suite lines.
pub struct SuiteProgress {
    multi: MultiProgress,
    spinners: HashMap<usize, ProgressBar>,
    show_spinners: bool,
}

impl SuiteProgress {
    pub fn new(show_spinners: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            spinners: HashMap::new(),
            show_spinners,
        }
    }

    pub fn handle_event(&mut self, event: &OrchestratorEvent) {
        match event {
            OrchestratorEvent::SuiteStarted { index, name } => {
                self.println(&render_suite_header(name));
                if self.show_spinners {
                    let bar = self.multi.add(ProgressBar::new_spinner());
                    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
                        bar.set_style(spinner_style);
                    }
                    bar.set_message(format!("{} checks running...", name));
                    bar.enable_steady_tick(Duration::from_millis(120));
                    self.spinners.insert(*index, bar);
                }
            }
            OrchestratorEvent::SuiteCompleted { index, name, tests, passed, failed, vulnerabilities, duration_ms } => {
                if let Some(bar) = self.spinners.remove(index) {
                    bar.finish_and_clear();
                }
                self.println(&render_suite_line(name, *tests, *passed, *failed, *vulnerabilities, *duration_ms));
            }
            OrchestratorEvent::SuiteFailed { index, name, error } => {
                if let Some(bar) = self.spinners.remove(index) {
                    bar.abandon_with_message(format!("{} failed", name));
                }
                self.println(&format!("  {} {} aborted: {}", style("✗").red(), name, error));
            }
            OrchestratorEvent::RunStarted { .. } | OrchestratorEvent::RunCompleted { .. } => {}
        }
    }

    /// Clear any spinner still running.
    pub fn finish(&mut self) {
        for (_, bar) in self.spinners.drain() {
            bar.finish_and_clear();
        }
    }

    /// Print a line above the spinners. Runs even when the bars are hidden.
    fn println(&self, msg: &str) {
        self.multi.suspend(|| println!("{}", msg));
    }
}

/// Drain events until the sender side is dropped.
pub async fn render_events(mut rx: mpsc::UnboundedReceiver<OrchestratorEvent>, show_spinners: bool) {
    let mut progress = SuiteProgress::new(show_spinners);
    while let Some(event) = rx.recv().await {
        progress.handle_event(&event);
    }
    progress.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(index: usize, name: &str) -> OrchestratorEvent {
        OrchestratorEvent::SuiteStarted { index, name: name.to_string() }
    }

    #[test]
    fn test_spinner_lifecycle() {
        let mut progress = SuiteProgress::new(true);
        progress.handle_event(&started(0, "Authentication"));
        progress.handle_event(&started(1, "Invoice"));
        assert_eq!(progress.spinners.len(), 2);

        progress.handle_event(&OrchestratorEvent::SuiteCompleted {
            index: 0,
            name: "Authentication".into(),
            tests: 8,
            passed: 8,
            failed: 0,
            vulnerabilities: 0,
            duration_ms: 120,
        });
        assert_eq!(progress.spinners.len(), 1);

        progress.handle_event(&OrchestratorEvent::SuiteFailed {
            index: 1,
            name: "Invoice".into(),
            error: "Network error: connection refused".into(),
        });
        assert!(progress.spinners.is_empty());
    }

    #[test]
    fn test_quiet_mode_has_no_spinners() {
        let mut progress = SuiteProgress::new(false);
        progress.handle_event(&started(0, "Authentication"));
        assert!(progress.spinners.is_empty());
        progress.finish();
    }

    #[tokio::test]
    async fn test_render_events_stops_when_sender_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(render_events(rx, false));
        tx.send(started(0, "Authentication")).unwrap();
        drop(tx);
        handle.await.unwrap();
    }
}
