/// Integration tests for the application layer
mod test_utilities;

use std::path::PathBuf;
use test_utilities::mocks::*;

use lockcheck::audit::domain::Severity;
use lockcheck::prelude::*;

const LOCKFILE_V3: &str = r#"{
    "name": "my-app",
    "version": "1.0.0",
    "lockfileVersion": 3,
    "packages": {
        "": {
            "name": "my-app",
            "version": "1.0.0",
            "dependencies": { "lodash": "^4.17.20", "ms": "^2.1.3" },
            "devDependencies": { "jest": "^29.0.0" }
        },
        "node_modules/lodash": {
            "version": "4.17.20",
            "integrity": "sha512-lodash",
            "dependencies": { "ms": "^2.1.3" }
        },
        "node_modules/ms": {
            "version": "2.1.3",
            "integrity": "sha512-ms"
        },
        "node_modules/jest": {
            "version": "29.7.0",
            "integrity": "sha512-jest",
            "dev": true
        }
    }
}"#;

fn use_case_with(
    lockfile_reader: MockLockfileReader,
    manifest_reader: MockManifestReader,
    advisory_repository: MockAdvisoryRepository,
    progress_reporter: MockProgressReporter,
) -> RunAuditUseCase<MockLockfileReader, MockManifestReader, MockAdvisoryRepository, MockProgressReporter>
{
    RunAuditUseCase::new(
        lockfile_reader,
        manifest_reader,
        advisory_repository,
        progress_reporter,
    )
}

#[tokio::test]
async fn test_audit_happy_path() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    assert!(!response.has_vulnerabilities_above_threshold());
    let report = response.report();
    assert_eq!(report.project_name(), Some("my-app"));
    assert_eq!(report.lockfile_version(), 3);
    assert_eq!(report.packages_scanned(), 3);
    assert!(report.passed());
}

#[tokio::test]
async fn test_audit_scanned_count_matches_lockfile_entries() {
    // The report must account for every resolved package in the lock file
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    // lodash, ms, jest
    assert_eq!(response.report().packages_scanned(), 3);
}

#[tokio::test]
async fn test_audit_detects_high_severity_finding() {
    let advisory_repository = MockAdvisoryRepository::new().with_advisory(
        "lodash",
        "4.17.20",
        "GHSA-35jh-r3h4-6jhm",
        Severity::High,
        Some(7.2),
    );

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        advisory_repository,
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    assert!(response.has_vulnerabilities_above_threshold());
    let report = response.report();
    assert_eq!(report.above_threshold().len(), 1);
    assert_eq!(report.above_threshold()[0].package_name(), "lodash");
    assert!(!report.passed());
}

#[tokio::test]
async fn test_audit_low_severity_passes_default_threshold() {
    let advisory_repository = MockAdvisoryRepository::new().with_advisory(
        "ms",
        "2.1.3",
        "GHSA-low-sev",
        Severity::Low,
        Some(3.1),
    );

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        advisory_repository,
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    assert!(!response.has_vulnerabilities_above_threshold());
    let report = response.report();
    assert!(report.above_threshold().is_empty());
    assert_eq!(report.below_threshold().len(), 1);
}

#[tokio::test]
async fn test_audit_custom_severity_threshold() {
    let advisory_repository = MockAdvisoryRepository::new().with_advisory(
        "ms",
        "2.1.3",
        "GHSA-med-sev",
        Severity::Medium,
        Some(5.4),
    );

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        advisory_repository,
        MockProgressReporter::new(),
    );

    let request =
        AuditRequest::new(PathBuf::from(".")).with_severity_threshold(Severity::Medium);
    let response = use_case.execute(request).await.unwrap();

    assert!(response.has_vulnerabilities_above_threshold());
}

#[tokio::test]
async fn test_audit_cvss_threshold_catches_unrated_severity() {
    // Advisory with a CVSS score but only a low severity label
    let advisory_repository = MockAdvisoryRepository::new().with_advisory(
        "lodash",
        "4.17.20",
        "GHSA-cvss-only",
        Severity::Low,
        Some(8.1),
    );

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        advisory_repository,
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from(".")).with_cvss_threshold(Some(7.0));
    let response = use_case.execute(request).await.unwrap();

    assert!(response.has_vulnerabilities_above_threshold());
}

#[tokio::test]
async fn test_audit_ignore_rule_suppresses_failure() {
    let advisory_repository = MockAdvisoryRepository::new().with_advisory(
        "lodash",
        "4.17.20",
        "GHSA-35jh-r3h4-6jhm",
        Severity::Critical,
        Some(9.1),
    );

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        advisory_repository,
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from(".")).with_ignore_rules(vec![IgnoreRule::new(
        "GHSA-35jh-r3h4-6jhm".to_string(),
        Some("accepted risk".to_string()),
    )]);
    let response = use_case.execute(request).await.unwrap();

    assert!(!response.has_vulnerabilities_above_threshold());
    let report = response.report();
    assert_eq!(report.ignored().len(), 1);
    assert_eq!(report.ignored()[0].advisory_id, "GHSA-35jh-r3h4-6jhm");
    assert_eq!(report.ignored()[0].reason.as_deref(), Some("accepted risk"));
}

#[tokio::test]
async fn test_audit_exclude_pattern_reduces_scan() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request =
        AuditRequest::new(PathBuf::from(".")).with_exclude_patterns(vec!["lodash".to_string()]);
    let response = use_case.execute(request).await.unwrap();

    assert_eq!(response.report().packages_scanned(), 2);
}

#[tokio::test]
async fn test_audit_exclude_all_packages_error() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request =
        AuditRequest::new(PathBuf::from(".")).with_exclude_patterns(vec!["*".to_string()]);
    let result = use_case.execute(request).await;

    assert!(result.is_err());
    let error = result.unwrap_err();
    assert!(error.to_string().contains("All"));
    assert!(error.to_string().contains("excluded"));
}

#[tokio::test]
async fn test_audit_omit_dev_skips_dev_packages() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from(".")).with_omit_dev(true);
    let response = use_case.execute(request).await.unwrap();

    // jest is a dev package
    assert_eq!(response.report().packages_scanned(), 2);
}

#[tokio::test]
async fn test_audit_lockfile_read_failure() {
    let use_case = use_case_with(
        MockLockfileReader::with_failure(),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let result = use_case.execute(request).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_audit_invalid_lockfile_json() {
    let use_case = use_case_with(
        MockLockfileReader::new("not json {{{".to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let result = use_case.execute(request).await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse package-lock.json"));
}

#[tokio::test]
async fn test_audit_manifest_failure_is_non_fatal() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::with_failure(),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    // Audit still completes, just without project metadata
    assert_eq!(response.report().project_name(), None);
    assert_eq!(response.report().packages_scanned(), 3);
}

#[tokio::test]
async fn test_audit_advisory_source_failure() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::with_failure(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let result = use_case.execute(request).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_audit_progress_reporting() {
    let progress_reporter = MockProgressReporter::new();

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        progress_reporter.clone(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let _response = use_case.execute(request).await.unwrap();

    // Verify that progress was reported
    assert!(progress_reporter.message_count() > 0);
    let messages = progress_reporter.get_messages();
    assert!(messages.iter().any(|m| m.contains("package-lock.json")));
}

#[tokio::test]
async fn test_audit_dependency_graph_counts() {
    let manifest_reader = MockManifestReader::new("my-app".to_string())
        .with_direct_dependencies(vec![
            "lodash".to_string(),
            "ms".to_string(),
            "jest".to_string(),
        ]);

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        manifest_reader,
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    let graph = response
        .report()
        .dependency_graph()
        .expect("Dependency graph should be present");
    assert_eq!(graph.direct_dependency_count(), 3);
}

#[tokio::test]
async fn test_audit_no_deps_skips_graph() {
    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        MockAdvisoryRepository::new(),
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from(".")).with_dependency_info(false);
    let response = use_case.execute(request).await.unwrap();

    assert!(response.report().dependency_graph().is_none());
}

#[tokio::test]
async fn test_audit_report_renders_in_every_format() {
    let advisory_repository = MockAdvisoryRepository::new().with_advisory(
        "lodash",
        "4.17.20",
        "GHSA-35jh-r3h4-6jhm",
        Severity::High,
        Some(7.2),
    );

    let use_case = use_case_with(
        MockLockfileReader::new(LOCKFILE_V3.to_string()),
        MockManifestReader::new("my-app".to_string()),
        advisory_repository,
        MockProgressReporter::new(),
    );

    let request = AuditRequest::new(PathBuf::from("."));
    let response = use_case.execute(request).await.unwrap();

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
        let formatter = FormatterFactory::create(format);
        let output = formatter.format(response.report()).unwrap();
        assert!(output.contains("GHSA-35jh-r3h4-6jhm"));
    }
}
