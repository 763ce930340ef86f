use crate::audit::domain::AuditReport;

/// Response DTO for the audit use case
#[derive(Debug)]
pub struct AuditResponse {
    report: AuditReport,
    has_vulnerabilities_above_threshold: bool,
}

impl AuditResponse {
    pub fn new(report: AuditReport) -> Self {
        let has_vulnerabilities_above_threshold = !report.passed();
        Self {
            report,
            has_vulnerabilities_above_threshold,
        }
    }

    pub fn report(&self) -> &AuditReport {
        &self.report
    }

    /// True when at least one non-ignored finding met the failure threshold
    pub fn has_vulnerabilities_above_threshold(&self) -> bool {
        self.has_vulnerabilities_above_threshold
    }
}
