use super::vulnerability::{PackageVulnerabilities, Severity};
use super::DependencyGraph;

/// AuditMetadata value object describing one audit run
#[derive(Debug, Clone)]
pub struct AuditMetadata {
    timestamp: String,
    tool_name: String,
    tool_version: String,
    serial_number: String,
}

impl AuditMetadata {
    pub fn new(
        timestamp: String,
        tool_name: String,
        tool_version: String,
        serial_number: String,
    ) -> Self {
        Self {
            timestamp,
            tool_name,
            tool_version,
            serial_number,
        }
    }

    /// Generates metadata for the current run with a fresh serial number
    pub fn generate() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            tool_name: "lockcheck".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

/// A finding suppressed by the ignore list, kept for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoredFinding {
    pub package_name: String,
    pub package_version: String,
    pub advisory_id: String,
    pub reason: Option<String>,
}

/// Per-severity advisory counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
}

impl AuditSummary {
    pub fn from_findings<'a>(
        findings: impl IntoIterator<Item = &'a PackageVulnerabilities>,
    ) -> Self {
        let mut summary = Self::default();
        for pkg_vulns in findings {
            for vuln in pkg_vulns.vulnerabilities() {
                match vuln.severity() {
                    Severity::Critical => summary.critical += 1,
                    Severity::High => summary.high += 1,
                    Severity::Medium => summary.medium += 1,
                    Severity::Low => summary.low += 1,
                    Severity::None => summary.none += 1,
                }
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.none
    }
}

/// AuditReport - the complete result of one audit run
///
/// This is the read model handed to formatters: everything they need
/// is reachable from here without further lookups.
#[derive(Debug, Clone)]
pub struct AuditReport {
    metadata: AuditMetadata,
    project_name: Option<String>,
    lockfile_version: u64,
    packages_scanned: usize,
    dependency_graph: Option<DependencyGraph>,
    above_threshold: Vec<PackageVulnerabilities>,
    below_threshold: Vec<PackageVulnerabilities>,
    ignored: Vec<IgnoredFinding>,
    severity_threshold: Severity,
    cvss_threshold: Option<f32>,
}

impl AuditReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metadata: AuditMetadata,
        project_name: Option<String>,
        lockfile_version: u64,
        packages_scanned: usize,
        dependency_graph: Option<DependencyGraph>,
        above_threshold: Vec<PackageVulnerabilities>,
        below_threshold: Vec<PackageVulnerabilities>,
        ignored: Vec<IgnoredFinding>,
        severity_threshold: Severity,
        cvss_threshold: Option<f32>,
    ) -> Self {
        Self {
            metadata,
            project_name,
            lockfile_version,
            packages_scanned,
            dependency_graph,
            above_threshold,
            below_threshold,
            ignored,
            severity_threshold,
            cvss_threshold,
        }
    }

    pub fn metadata(&self) -> &AuditMetadata {
        &self.metadata
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn lockfile_version(&self) -> u64 {
        self.lockfile_version
    }

    /// Number of lock file entries that were audited
    pub fn packages_scanned(&self) -> usize {
        self.packages_scanned
    }

    pub fn dependency_graph(&self) -> Option<&DependencyGraph> {
        self.dependency_graph.as_ref()
    }

    /// Findings at or above the configured threshold (these fail the audit)
    pub fn above_threshold(&self) -> &[PackageVulnerabilities] {
        &self.above_threshold
    }

    /// Findings below the configured threshold (reported, but non-fatal)
    pub fn below_threshold(&self) -> &[PackageVulnerabilities] {
        &self.below_threshold
    }

    pub fn ignored(&self) -> &[IgnoredFinding] {
        &self.ignored
    }

    pub fn severity_threshold(&self) -> Severity {
        self.severity_threshold
    }

    pub fn cvss_threshold(&self) -> Option<f32> {
        self.cvss_threshold
    }

    /// Whether the audit passed (no findings at or above the threshold)
    pub fn passed(&self) -> bool {
        self.above_threshold.is_empty()
    }

    /// All non-ignored findings, above and below threshold
    pub fn all_findings(&self) -> impl Iterator<Item = &PackageVulnerabilities> {
        self.above_threshold.iter().chain(self.below_threshold.iter())
    }

    pub fn summary(&self) -> AuditSummary {
        AuditSummary::from_findings(self.all_findings())
    }
}
