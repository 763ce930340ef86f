use crate::audit::domain::{AuditReport, PackageVulnerabilities, Severity};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use owo_colors::OwoColorize;
use std::fmt::Write;

/// TextFormatter - Human-readable console report
///
/// Renders the audit report as colored text for terminal consumption.
/// Severity labels are colored by level; the pass/fail verdict closes
/// the report.
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    fn colored_severity(severity: Severity) -> String {
        match severity {
            Severity::Critical => severity.as_str().red().bold().to_string(),
            Severity::High => severity.as_str().red().to_string(),
            Severity::Medium => severity.as_str().yellow().to_string(),
            Severity::Low => severity.as_str().green().to_string(),
            Severity::None => severity.as_str().dimmed().to_string(),
        }
    }

    fn write_findings_section(
        output: &mut String,
        title: &str,
        findings: &[PackageVulnerabilities],
    ) {
        if findings.is_empty() {
            return;
        }

        let _ = writeln!(output);
        let _ = writeln!(output, "{}", title.bold());

        for pkg_vulns in findings {
            let _ = writeln!(
                output,
                "  {} {}@{}",
                Self::colored_severity(pkg_vulns.max_severity()),
                pkg_vulns.package_name().bold(),
                pkg_vulns.package_version()
            );
            for vuln in pkg_vulns.vulnerabilities() {
                let cvss = vuln
                    .cvss_score()
                    .map(|s| format!(" (CVSS {})", s))
                    .unwrap_or_default();
                let fix = vuln
                    .fixed_version()
                    .map(|v| format!(" -> fixed in {}", v))
                    .unwrap_or_else(|| " -> no fix available".to_string());
                let _ = writeln!(
                    output,
                    "      {} [{}]{}{}",
                    vuln.id(),
                    Self::colored_severity(vuln.severity()),
                    cvss,
                    fix
                );
                if let Some(summary) = vuln.summary() {
                    let _ = writeln!(output, "        {}", summary.dimmed());
                }
            }
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", "Dependency Audit Report".bold())?;
        writeln!(output, "{}", "=======================".bold())?;
        if let Some(project_name) = report.project_name() {
            writeln!(output, "Project:          {}", project_name)?;
        }
        writeln!(output, "Generated:        {}", report.metadata().timestamp())?;
        writeln!(output, "Run ID:           {}", report.metadata().serial_number())?;
        writeln!(output, "Lockfile version: {}", report.lockfile_version())?;
        writeln!(output, "Packages scanned: {}", report.packages_scanned())?;

        if let Some(graph) = report.dependency_graph() {
            writeln!(output)?;
            writeln!(output, "{}", "Dependencies".bold())?;
            writeln!(
                output,
                "  Direct:     {}",
                graph.direct_dependency_count()
            )?;
            writeln!(
                output,
                "  Transitive: {}",
                graph.transitive_dependency_count()
            )?;
        }

        let summary = report.summary();
        writeln!(output)?;
        writeln!(output, "{}", "Advisory Summary".bold())?;
        writeln!(
            output,
            "  critical: {}  high: {}  medium: {}  low: {}  unknown: {}",
            summary.critical, summary.high, summary.medium, summary.low, summary.none
        )?;

        Self::write_findings_section(
            &mut output,
            &format!(
                "Findings at or above '{}' severity",
                report.severity_threshold()
            ),
            report.above_threshold(),
        );
        Self::write_findings_section(
            &mut output,
            "Findings below threshold",
            report.below_threshold(),
        );

        if !report.ignored().is_empty() {
            writeln!(output)?;
            writeln!(output, "{}", "Ignored advisories".bold())?;
            for ignored in report.ignored() {
                let reason = ignored
                    .reason
                    .as_deref()
                    .map(|r| format!(" ({})", r))
                    .unwrap_or_default();
                writeln!(
                    output,
                    "  {} in {}@{}{}",
                    ignored.advisory_id, ignored.package_name, ignored.package_version, reason
                )?;
            }
        }

        writeln!(output)?;
        if report.passed() {
            writeln!(
                output,
                "{}",
                format!(
                    "✅ Audit passed: no advisories at or above '{}' severity",
                    report.severity_threshold()
                )
                .green()
            )?;
        } else {
            let failing: usize = report
                .above_threshold()
                .iter()
                .map(|f| f.vulnerabilities().len())
                .sum();
            writeln!(
                output,
                "{}",
                format!(
                    "❌ Audit failed: {} advisories at or above '{}' severity",
                    failing,
                    report.severity_threshold()
                )
                .red()
                .bold()
            )?;
        }

        Ok(output)
    }
}
