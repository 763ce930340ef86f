use crate::audit::domain::AuditReport;
use crate::shared::Result;

/// ReportFormatter port for rendering audit reports
///
/// This port abstracts the formatting logic for the different report
/// formats (text, JSON, Markdown).
pub trait ReportFormatter {
    /// Renders the audit report
    ///
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, report: &AuditReport) -> Result<String>;
}
