use crate::audit::domain::report::IgnoredFinding;
use crate::audit::domain::vulnerability::{PackageVulnerabilities, Severity, Vulnerability};

/// An advisory ID to suppress, with an optional justification
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoreRule {
    pub id: String,
    pub reason: Option<String>,
}

impl IgnoreRule {
    pub fn new(id: String, reason: Option<String>) -> Self {
        Self { id, reason }
    }
}

/// Result of evaluating findings against the threshold policy
#[derive(Debug, Clone, Default)]
pub struct ThresholdEvaluation {
    /// Findings that fail the audit
    pub above_threshold: Vec<PackageVulnerabilities>,
    /// Findings reported but not fatal
    pub below_threshold: Vec<PackageVulnerabilities>,
    /// Findings suppressed by the ignore list
    pub ignored: Vec<IgnoredFinding>,
}

impl ThresholdEvaluation {
    pub fn passed(&self) -> bool {
        self.above_threshold.is_empty()
    }
}

/// ThresholdPolicy - Decides which findings fail the audit
///
/// A finding is fatal when its severity is at or above the severity
/// threshold, or when its CVSS score is at or above the CVSS threshold
/// (when one is configured). Ignored advisory IDs never fail the audit
/// but are kept in the evaluation for reporting.
#[derive(Debug, Clone)]
pub struct ThresholdPolicy {
    severity_threshold: Severity,
    cvss_threshold: Option<f32>,
    ignore_rules: Vec<IgnoreRule>,
}

impl ThresholdPolicy {
    pub fn new(
        severity_threshold: Severity,
        cvss_threshold: Option<f32>,
        ignore_rules: Vec<IgnoreRule>,
    ) -> Self {
        Self {
            severity_threshold,
            cvss_threshold,
            ignore_rules,
        }
    }

    pub fn severity_threshold(&self) -> Severity {
        self.severity_threshold
    }

    pub fn cvss_threshold(&self) -> Option<f32> {
        self.cvss_threshold
    }

    /// Splits findings into above-threshold, below-threshold, and ignored buckets
    pub fn evaluate(&self, findings: Vec<PackageVulnerabilities>) -> ThresholdEvaluation {
        let mut evaluation = ThresholdEvaluation::default();

        for pkg_vulns in findings {
            let mut above = Vec::new();
            let mut below = Vec::new();

            for vuln in pkg_vulns.vulnerabilities() {
                if let Some(rule) = self.ignore_rule_for(vuln.id()) {
                    evaluation.ignored.push(IgnoredFinding {
                        package_name: pkg_vulns.package_name().to_string(),
                        package_version: pkg_vulns.package_version().to_string(),
                        advisory_id: vuln.id().to_string(),
                        reason: rule.reason.clone(),
                    });
                } else if self.triggers(vuln) {
                    above.push(vuln.clone());
                } else {
                    below.push(vuln.clone());
                }
            }

            if !above.is_empty() {
                evaluation.above_threshold.push(PackageVulnerabilities::new(
                    pkg_vulns.package_name().to_string(),
                    pkg_vulns.package_version().to_string(),
                    above,
                ));
            }
            if !below.is_empty() {
                evaluation.below_threshold.push(PackageVulnerabilities::new(
                    pkg_vulns.package_name().to_string(),
                    pkg_vulns.package_version().to_string(),
                    below,
                ));
            }
        }

        evaluation
    }

    fn ignore_rule_for(&self, advisory_id: &str) -> Option<&IgnoreRule> {
        self.ignore_rules
            .iter()
            .find(|rule| rule.id.eq_ignore_ascii_case(advisory_id))
    }

    fn triggers(&self, vuln: &Vulnerability) -> bool {
        if vuln.severity() >= self.severity_threshold && vuln.severity() != Severity::None {
            return true;
        }
        match (self.cvss_threshold, vuln.cvss_score()) {
            (Some(threshold), Some(score)) => score.value() >= threshold,
            _ => false,
        }
    }
}
