use crate::audit::domain::{AuditReport, PackageVulnerabilities};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

/// JsonFormatter - Machine-readable report for CI pipelines
///
/// Serializes the audit report to pretty-printed JSON with camelCase
/// field names.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport {
    tool: String,
    version: String,
    timestamp: String,
    run_id: String,
    project_name: Option<String>,
    lockfile_version: u64,
    packages_scanned: usize,
    severity_threshold: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvss_threshold: Option<f32>,
    passed: bool,
    summary: JsonSummary,
    findings: Vec<JsonFinding>,
    ignored: Vec<JsonIgnored>,
}

#[derive(Serialize)]
struct JsonSummary {
    critical: usize,
    high: usize,
    medium: usize,
    low: usize,
    unknown: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFinding {
    package: String,
    version: String,
    max_severity: String,
    above_threshold: bool,
    advisories: Vec<JsonAdvisory>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonAdvisory {
    id: String,
    severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvss_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonIgnored {
    package: String,
    version: String,
    advisory_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn to_json_finding(pkg_vulns: &PackageVulnerabilities, above_threshold: bool) -> JsonFinding {
    JsonFinding {
        package: pkg_vulns.package_name().to_string(),
        version: pkg_vulns.package_version().to_string(),
        max_severity: pkg_vulns.max_severity().to_string(),
        above_threshold,
        advisories: pkg_vulns
            .vulnerabilities()
            .iter()
            .map(|vuln| JsonAdvisory {
                id: vuln.id().to_string(),
                severity: vuln.severity().to_string(),
                cvss_score: vuln.cvss_score().map(|s| s.value()),
                fixed_version: vuln.fixed_version().map(String::from),
                summary: vuln.summary().map(String::from),
            })
            .collect(),
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let summary = report.summary();

        let mut findings: Vec<JsonFinding> = report
            .above_threshold()
            .iter()
            .map(|f| to_json_finding(f, true))
            .collect();
        findings.extend(
            report
                .below_threshold()
                .iter()
                .map(|f| to_json_finding(f, false)),
        );

        let document = JsonReport {
            tool: report.metadata().tool_name().to_string(),
            version: report.metadata().tool_version().to_string(),
            timestamp: report.metadata().timestamp().to_string(),
            run_id: report.metadata().serial_number().to_string(),
            project_name: report.project_name().map(String::from),
            lockfile_version: report.lockfile_version(),
            packages_scanned: report.packages_scanned(),
            severity_threshold: report.severity_threshold().to_string(),
            cvss_threshold: report.cvss_threshold(),
            passed: report.passed(),
            summary: JsonSummary {
                critical: summary.critical,
                high: summary.high,
                medium: summary.medium,
                low: summary.low,
                unknown: summary.none,
            },
            findings,
            ignored: report
                .ignored()
                .iter()
                .map(|i| JsonIgnored {
                    package: i.package_name.clone(),
                    version: i.package_version.clone(),
                    advisory_id: i.advisory_id.clone(),
                    reason: i.reason.clone(),
                })
                .collect(),
        };

        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        Ok(json)
    }
}
