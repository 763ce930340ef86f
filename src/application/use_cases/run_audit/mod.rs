use crate::application::dto::{AuditRequest, AuditResponse};
use crate::application::use_cases::FetchAdvisoriesUseCase;
use crate::audit::domain::{
    AuditMetadata, AuditReport, DependencyGraph, LockfileParseResult, Package, PackageName,
    PackageVulnerabilities,
};
use crate::audit::services::{DependencyAnalyzer, PackageFilter, ThresholdPolicy};
use crate::ports::outbound::{
    AdvisoryRepository, LockfileReader, ManifestReader, ProgressReporter, ProjectManifest,
};
use crate::shared::Result;
use std::collections::HashMap;

/// Type alias for the lock file contents after filtering
/// Used to simplify complex return types and satisfy clippy::type_complexity
type FilteredLockfile = (Vec<Package>, HashMap<String, Vec<String>>, Vec<String>);

/// RunAuditUseCase - Core use case for dependency auditing
///
/// This use case orchestrates the audit workflow using generic
/// dependency injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `LR` - LockfileReader implementation
/// * `MR` - ManifestReader implementation
/// * `AR` - AdvisoryRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct RunAuditUseCase<LR, MR, AR, PR> {
    lockfile_reader: LR,
    manifest_reader: MR,
    advisory_repository: AR,
    progress_reporter: PR,
}

impl<LR, MR, AR, PR> RunAuditUseCase<LR, MR, AR, PR>
where
    LR: LockfileReader,
    MR: ManifestReader,
    AR: AdvisoryRepository + Clone,
    PR: ProgressReporter,
{
    /// Creates a new RunAuditUseCase with injected dependencies
    pub fn new(
        lockfile_reader: LR,
        manifest_reader: MR,
        advisory_repository: AR,
        progress_reporter: PR,
    ) -> Self {
        Self {
            lockfile_reader,
            manifest_reader,
            advisory_repository,
            progress_reporter,
        }
    }

    /// Executes the audit use case
    ///
    /// # Arguments
    /// * `request` - Audit request containing project path and options
    ///
    /// # Returns
    /// AuditResponse containing the complete audit report
    pub async fn execute(&self, request: AuditRequest) -> Result<AuditResponse> {
        // Step 1: Read and parse the lock file
        let lockfile = self.read_and_report_lockfile(&request)?;
        let lockfile_version = lockfile.lockfile_version;

        // Step 2: Read the project manifest (best effort)
        let manifest = self.read_manifest_best_effort(&request);

        // Step 3: Drop dev dependencies if requested
        let packages = self.omit_dev_if_requested(lockfile.packages, &request);

        // Step 4: Apply exclusion filters
        let direct_dependencies = manifest
            .as_ref()
            .map(|m| m.direct_dependencies.clone())
            .unwrap_or_else(|| lockfile.direct_dependencies.clone());
        let (filtered_packages, filtered_dependency_map, filtered_direct) = self
            .apply_exclusion_filters(
                packages,
                lockfile.dependency_map,
                direct_dependencies,
                &request,
            )?;

        // Step 5: Build the dependency graph if requested
        let dependency_graph = self.analyze_dependencies_if_requested(
            &request,
            manifest.as_ref(),
            &filtered_direct,
            &filtered_dependency_map,
        )?;

        // Step 6: Query the advisory database
        let findings = self.fetch_advisories(&filtered_packages).await?;

        // Step 7: Evaluate findings against the threshold policy
        let policy = ThresholdPolicy::new(
            request.severity_threshold(),
            request.cvss_threshold(),
            request.ignore_rules().to_vec(),
        );
        let evaluation = policy.evaluate(findings);

        // Step 8: Build the report
        let report = AuditReport::new(
            AuditMetadata::generate(),
            manifest.map(|m| m.name),
            lockfile_version,
            filtered_packages.len(),
            dependency_graph,
            evaluation.above_threshold,
            evaluation.below_threshold,
            evaluation.ignored,
            request.severity_threshold(),
            request.cvss_threshold(),
        );

        Ok(AuditResponse::new(report))
    }

    /// Reads and parses the lock file, reporting progress
    fn read_and_report_lockfile(&self, request: &AuditRequest) -> Result<LockfileParseResult> {
        self.progress_reporter.report(&format!(
            "📖 Loading package-lock.json from: {}",
            request.project_path().display()
        ));

        let lockfile = self
            .lockfile_reader
            .read_and_parse_lockfile(request.project_path())?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} package(s) (lockfile version {})",
            lockfile.packages.len(),
            lockfile.lockfile_version
        ));

        Ok(lockfile)
    }

    /// Reads the project manifest, downgrading failures to a warning
    ///
    /// The audit itself only needs the lock file. The manifest supplies
    /// the project name and the declared direct dependencies, so a
    /// missing or broken package.json must not abort the run.
    fn read_manifest_best_effort(&self, request: &AuditRequest) -> Option<ProjectManifest> {
        match self.manifest_reader.read_manifest(request.project_path()) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Could not read package.json: {}. Continuing without project metadata.",
                    e
                ));
                None
            }
        }
    }

    /// Drops dev dependencies when --omit-dev is active
    fn omit_dev_if_requested(&self, packages: Vec<Package>, request: &AuditRequest) -> Vec<Package> {
        if !request.omit_dev() {
            return packages;
        }

        let original_count = packages.len();
        let kept: Vec<Package> = packages.into_iter().filter(|p| !p.is_dev()).collect();
        let skipped = original_count - kept.len();
        if skipped > 0 {
            self.progress_reporter
                .report(&format!("🚫 Skipped {} dev package(s)", skipped));
        }
        kept
    }

    /// Applies exclusion filters to packages, dependency map, and direct deps
    ///
    /// # Errors
    /// Returns an error if all packages are excluded
    fn apply_exclusion_filters(
        &self,
        packages: Vec<Package>,
        dependency_map: HashMap<String, Vec<String>>,
        direct_dependencies: Vec<String>,
        request: &AuditRequest,
    ) -> Result<FilteredLockfile> {
        if request.exclude_patterns().is_empty() {
            return Ok((packages, dependency_map, direct_dependencies));
        }

        let filter = PackageFilter::new(request.exclude_patterns().to_vec())?;
        let original_count = packages.len();
        let filtered_pkgs = filter.filter_packages(packages);
        let filtered_deps = filter.filter_dependency_map(dependency_map);
        let filtered_direct = filter.filter_names(direct_dependencies);

        let excluded_count = original_count - filtered_pkgs.len();
        if excluded_count > 0 {
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} package(s) based on filters",
                excluded_count
            ));
        }

        // Check if all packages were excluded
        if filtered_pkgs.is_empty() {
            anyhow::bail!(
                "All {} package(s) were excluded by the provided filters. \
                     Nothing is left to audit. Please adjust your exclusion patterns.",
                original_count
            );
        }

        // Warn about unmatched patterns
        let unmatched_patterns = filter.get_unmatched_patterns();
        for pattern in unmatched_patterns {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any dependencies.",
                pattern
            ));
        }

        Ok((filtered_pkgs, filtered_deps, filtered_direct))
    }

    /// Builds the dependency graph if requested in the audit request
    fn analyze_dependencies_if_requested(
        &self,
        request: &AuditRequest,
        manifest: Option<&ProjectManifest>,
        direct_dependencies: &[String],
        dependency_map: &HashMap<String, Vec<String>>,
    ) -> Result<Option<DependencyGraph>> {
        if !request.include_dependency_info() {
            return Ok(None);
        }

        self.progress_reporter
            .report("📊 Parsing dependency information...");

        let project_name = manifest
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "root".to_string());
        // The manifest name only labels the graph root; an unusual name
        // must not abort the audit
        let project_package_name = match PackageName::new(project_name.clone()) {
            Ok(name) => name,
            Err(e) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: package.json name '{}' is not a valid package name ({}). Labeling the dependency graph root as 'root'.",
                    project_name, e
                ));
                PackageName::new("root".to_string())?
            }
        };

        let graph =
            DependencyAnalyzer::analyze(&project_package_name, direct_dependencies, dependency_map)?;

        self.progress_reporter.report(&format!(
            "   - Direct dependencies: {}",
            graph.direct_dependency_count()
        ));
        self.progress_reporter.report(&format!(
            "   - Transitive dependencies: {}",
            graph.transitive_dependency_count()
        ));

        Ok(Some(graph))
    }

    /// Queries the advisory database, reporting completion based on results
    async fn fetch_advisories(
        &self,
        packages: &[Package],
    ) -> Result<Vec<PackageVulnerabilities>> {
        self.progress_reporter.report(&format!(
            "🔍 Querying the advisory database for {} package(s)...",
            packages.len()
        ));

        let fetch_use_case = FetchAdvisoriesUseCase::new(self.advisory_repository.clone());
        let findings = fetch_use_case.fetch_with_progress(packages.to_vec()).await?;

        eprintln!(); // Add newline after progress bar
        let (total_advisories, affected_packages) = FetchAdvisoriesUseCase::<AR>::summarize(&findings);
        if total_advisories > 0 {
            self.progress_reporter.report_completion(&format!(
                "✅ Advisory check complete: {} advisories found in {} package(s)",
                total_advisories, affected_packages
            ));
        } else {
            self.progress_reporter
                .report_completion("✅ Advisory check complete: No known advisories found");
        }

        Ok(findings)
    }
}
