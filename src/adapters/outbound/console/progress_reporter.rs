use crate::ports::outbound::ProgressReporter;
use owo_colors::OwoColorize;

/// StderrProgressReporter adapter for audit step messages
///
/// Writes the audit's step messages, warnings, and completion summary to
/// stderr, keeping stdout free for the report itself. The advisory fetch
/// draws its own progress bar; this reporter covers the surrounding
/// line-based output.
pub struct StderrProgressReporter;

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_error(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn report_completion(&self, message: &str) {
        eprintln!("{}", message.bold());
    }
}
