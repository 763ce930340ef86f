use crate::audit::domain::{AuditReport, PackageVulnerabilities};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use std::fmt::Write;

/// Table header for the findings section
const FINDINGS_TABLE_HEADER: &str = "| Package | Version | Severity | CVSS | Advisory | Fixed In |";
const FINDINGS_TABLE_SEPARATOR: &str = "|---------|---------|----------|------|----------|----------|";

/// Table header for the ignored advisories section
const IGNORED_TABLE_HEADER: &str = "| Package | Version | Advisory | Reason |";
const IGNORED_TABLE_SEPARATOR: &str = "|---------|---------|----------|--------|";

/// MarkdownFormatter - Report suitable for pull request comments and wikis
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    fn write_findings_table(
        output: &mut String,
        findings: &[PackageVulnerabilities],
    ) -> std::fmt::Result {
        writeln!(output, "{}", FINDINGS_TABLE_HEADER)?;
        writeln!(output, "{}", FINDINGS_TABLE_SEPARATOR)?;
        for pkg_vulns in findings {
            for vuln in pkg_vulns.vulnerabilities() {
                writeln!(
                    output,
                    "| {} | {} | {} | {} | {} | {} |",
                    pkg_vulns.package_name(),
                    pkg_vulns.package_version(),
                    vuln.severity(),
                    vuln.cvss_score()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    vuln.id(),
                    vuln.fixed_version().unwrap_or("-")
                )?;
            }
        }
        Ok(())
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Dependency Audit Report")?;
        writeln!(output)?;
        if let Some(project_name) = report.project_name() {
            writeln!(output, "- **Project:** {}", project_name)?;
        }
        writeln!(output, "- **Generated:** {}", report.metadata().timestamp())?;
        writeln!(
            output,
            "- **Tool:** {} {}",
            report.metadata().tool_name(),
            report.metadata().tool_version()
        )?;
        writeln!(
            output,
            "- **Lockfile version:** {}",
            report.lockfile_version()
        )?;
        writeln!(
            output,
            "- **Packages scanned:** {}",
            report.packages_scanned()
        )?;
        writeln!(
            output,
            "- **Severity threshold:** {}",
            report.severity_threshold()
        )?;
        if let Some(cvss) = report.cvss_threshold() {
            writeln!(output, "- **CVSS threshold:** {:.1}", cvss)?;
        }

        let summary = report.summary();
        writeln!(output)?;
        writeln!(output, "## Summary")?;
        writeln!(output)?;
        writeln!(output, "| Critical | High | Medium | Low | Unknown |")?;
        writeln!(output, "|----------|------|--------|-----|---------|")?;
        writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            summary.critical, summary.high, summary.medium, summary.low, summary.none
        )?;

        if !report.above_threshold().is_empty() {
            writeln!(output)?;
            writeln!(output, "## Findings above threshold")?;
            writeln!(output)?;
            Self::write_findings_table(&mut output, report.above_threshold())?;
        }

        if !report.below_threshold().is_empty() {
            writeln!(output)?;
            writeln!(output, "## Findings below threshold")?;
            writeln!(output)?;
            Self::write_findings_table(&mut output, report.below_threshold())?;
        }

        if !report.ignored().is_empty() {
            writeln!(output)?;
            writeln!(output, "## Ignored advisories")?;
            writeln!(output)?;
            writeln!(output, "{}", IGNORED_TABLE_HEADER)?;
            writeln!(output, "{}", IGNORED_TABLE_SEPARATOR)?;
            for ignored in report.ignored() {
                writeln!(
                    output,
                    "| {} | {} | {} | {} |",
                    ignored.package_name,
                    ignored.package_version,
                    ignored.advisory_id,
                    ignored.reason.as_deref().unwrap_or("-")
                )?;
            }
        }

        writeln!(output)?;
        if report.passed() {
            writeln!(
                output,
                "✅ **Audit passed:** no advisories at or above `{}` severity.",
                report.severity_threshold()
            )?;
        } else {
            writeln!(
                output,
                "❌ **Audit failed:** advisories at or above `{}` severity were found.",
                report.severity_threshold()
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::{AuditMetadata, CvssScore, IgnoredFinding, Severity, Vulnerability};

    fn finding(name: &str, id: &str, severity: Severity) -> PackageVulnerabilities {
        PackageVulnerabilities::new(
            name.to_string(),
            "4.17.20".to_string(),
            vec![Vulnerability::new(
                id.to_string(),
                Some(CvssScore::new(9.1).unwrap()),
                severity,
                Some("4.17.21".to_string()),
                None,
            )
            .unwrap()],
        )
    }

    fn report(above: Vec<PackageVulnerabilities>, ignored: Vec<IgnoredFinding>) -> AuditReport {
        AuditReport::new(
            AuditMetadata::generate(),
            Some("my-app".to_string()),
            3,
            17,
            None,
            above,
            vec![],
            ignored,
            Severity::High,
            None,
        )
    }

    #[test]
    fn test_format_passing_report() {
        let formatter = MarkdownFormatter::new();
        let output = formatter.format(&report(vec![], vec![])).unwrap();

        assert!(output.contains("# Dependency Audit Report"));
        assert!(output.contains("- **Project:** my-app"));
        assert!(output.contains("- **Packages scanned:** 17"));
        assert!(output.contains("✅ **Audit passed:**"));
        assert!(!output.contains("## Findings above threshold"));
    }

    #[test]
    fn test_format_failing_report_has_findings_table() {
        let formatter = MarkdownFormatter::new();
        let output = formatter
            .format(&report(
                vec![finding("lodash", "GHSA-p6mc-m468-83gw", Severity::Critical)],
                vec![],
            ))
            .unwrap();

        assert!(output.contains("## Findings above threshold"));
        assert!(output.contains(FINDINGS_TABLE_HEADER));
        assert!(output
            .contains("| lodash | 4.17.20 | critical | 9.1 | GHSA-p6mc-m468-83gw | 4.17.21 |"));
        assert!(output.contains("❌ **Audit failed:**"));
    }

    #[test]
    fn test_format_ignored_table() {
        let formatter = MarkdownFormatter::new();
        let output = formatter
            .format(&report(
                vec![],
                vec![IgnoredFinding {
                    package_name: "lodash".to_string(),
                    package_version: "4.17.20".to_string(),
                    advisory_id: "GHSA-p6mc-m468-83gw".to_string(),
                    reason: Some("accepted risk".to_string()),
                }],
            ))
            .unwrap();

        assert!(output.contains("## Ignored advisories"));
        assert!(output.contains("| lodash | 4.17.20 | GHSA-p6mc-m468-83gw | accepted risk |"));
    }
}
