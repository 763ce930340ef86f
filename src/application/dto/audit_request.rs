use crate::audit::domain::Severity;
use crate::audit::services::IgnoreRule;
use std::path::PathBuf;

/// Request DTO for the audit use case
///
/// Carries everything the use case needs to run one audit, assembled
/// from the command line and the optional configuration file.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    project_path: PathBuf,
    exclude_patterns: Vec<String>,
    severity_threshold: Severity,
    cvss_threshold: Option<f32>,
    ignore_rules: Vec<IgnoreRule>,
    omit_dev: bool,
    include_dependency_info: bool,
}

impl AuditRequest {
    /// Creates a request with default settings for the given project path
    ///
    /// Defaults: no exclusions, High severity threshold, no CVSS
    /// threshold, no ignore rules, dev dependencies included,
    /// dependency graph included.
    pub fn new(project_path: PathBuf) -> Self {
        Self {
            project_path,
            exclude_patterns: Vec::new(),
            severity_threshold: Severity::High,
            cvss_threshold: None,
            ignore_rules: Vec::new(),
            omit_dev: false,
            include_dependency_info: true,
        }
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_severity_threshold(mut self, threshold: Severity) -> Self {
        self.severity_threshold = threshold;
        self
    }

    pub fn with_cvss_threshold(mut self, threshold: Option<f32>) -> Self {
        self.cvss_threshold = threshold;
        self
    }

    pub fn with_ignore_rules(mut self, rules: Vec<IgnoreRule>) -> Self {
        self.ignore_rules = rules;
        self
    }

    pub fn with_omit_dev(mut self, omit_dev: bool) -> Self {
        self.omit_dev = omit_dev;
        self
    }

    pub fn with_dependency_info(mut self, include: bool) -> Self {
        self.include_dependency_info = include;
        self
    }

    pub fn project_path(&self) -> &PathBuf {
        &self.project_path
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    pub fn severity_threshold(&self) -> Severity {
        self.severity_threshold
    }

    pub fn cvss_threshold(&self) -> Option<f32> {
        self.cvss_threshold
    }

    pub fn ignore_rules(&self) -> &[IgnoreRule] {
        &self.ignore_rules
    }

    pub fn omit_dev(&self) -> bool {
        self.omit_dev
    }

    pub fn include_dependency_info(&self) -> bool {
        self.include_dependency_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let request = AuditRequest::new(PathBuf::from("/tmp/project"));
        assert_eq!(request.project_path(), &PathBuf::from("/tmp/project"));
        assert!(request.exclude_patterns().is_empty());
        assert_eq!(request.severity_threshold(), Severity::High);
        assert_eq!(request.cvss_threshold(), None);
        assert!(request.ignore_rules().is_empty());
        assert!(!request.omit_dev());
        assert!(request.include_dependency_info());
    }

    #[test]
    fn test_builder_chain() {
        let request = AuditRequest::new(PathBuf::from("."))
            .with_exclude_patterns(vec!["lodash*".to_string()])
            .with_severity_threshold(Severity::Medium)
            .with_cvss_threshold(Some(6.5))
            .with_ignore_rules(vec![IgnoreRule::new(
                "GHSA-xxxx-yyyy-zzzz".to_string(),
                Some("accepted risk".to_string()),
            )])
            .with_omit_dev(true)
            .with_dependency_info(false);

        assert_eq!(request.exclude_patterns(), &["lodash*".to_string()]);
        assert_eq!(request.severity_threshold(), Severity::Medium);
        assert_eq!(request.cvss_threshold(), Some(6.5));
        assert_eq!(request.ignore_rules().len(), 1);
        assert!(request.omit_dev());
        assert!(!request.include_dependency_info());
    }
}
