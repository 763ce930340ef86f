use lockcheck::adapters::outbound::console::StderrProgressReporter;
use lockcheck::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemWriter, StdoutPresenter,
};
use lockcheck::adapters::outbound::network::{CachingAdvisoryRepository, OsvClient};
use lockcheck::application::dto::{AuditRequest, OutputFormat};
use lockcheck::application::factories::FormatterFactory;
use lockcheck::application::use_cases::RunAuditUseCase;
use lockcheck::audit::domain::Severity;
use lockcheck::audit::services::IgnoreRule;
use lockcheck::cli::Args;
use lockcheck::config::{discover_config, load_config_from_path, ConfigFile};
use lockcheck::ports::outbound::OutputPresenter;
use lockcheck::shared::error::{AuditError, ExitCode};
use lockcheck::shared::Result;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(true) => ExitCode::Success,
        Ok(false) => {
            eprintln!("\n❌ Audit failed: vulnerabilities at or above the configured threshold were found.");
            ExitCode::VulnerabilitiesDetected
        }
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

/// Runs the audit. Returns `Ok(true)` when the audit passed and
/// `Ok(false)` when findings at or above the threshold were detected.
async fn run() -> Result<bool> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate project directory
    let project_dir = args.path.as_deref().unwrap_or(".");
    let project_path = PathBuf::from(project_dir);

    validate_project_path(&project_path)?;

    // Load config file: explicit --config path, or auto-discovery in the
    // project directory
    let config = match args.config.as_deref() {
        Some(config_path) => Some(load_config_from_path(Path::new(config_path))?),
        None => discover_config(&project_path)?,
    };

    let options = resolve_options(&args, config.as_ref())?;

    // Create adapters (Dependency Injection)
    let lockfile_reader = FileSystemReader::new();
    let manifest_reader = FileSystemReader::new();
    let advisory_repository = CachingAdvisoryRepository::new(OsvClient::new()?);
    let progress_reporter = StderrProgressReporter::new();

    // Create use case with injected dependencies
    let use_case = RunAuditUseCase::new(
        lockfile_reader,
        manifest_reader,
        advisory_repository,
        progress_reporter,
    );

    // Create request
    let request = AuditRequest::new(project_path)
        .with_exclude_patterns(options.exclude_patterns)
        .with_severity_threshold(options.severity_threshold)
        .with_cvss_threshold(options.cvss_threshold)
        .with_ignore_rules(options.ignore_rules)
        .with_omit_dev(options.omit_dev)
        .with_dependency_info(!args.no_deps);

    // Execute use case
    let response = use_case.execute(request).await?;

    // Display progress message
    eprintln!("{}", FormatterFactory::progress_message(options.format));

    // Create formatter using factory
    let formatter = FormatterFactory::create(options.format);
    let formatted_output = formatter.format(response.report())?;

    // Present output
    let presenter: Box<dyn OutputPresenter> = if let Some(output_path) = args.output {
        Box::new(FileSystemWriter::new(PathBuf::from(output_path)))
    } else {
        Box::new(StdoutPresenter::new())
    };

    presenter.present(&formatted_output)?;

    Ok(!response.has_vulnerabilities_above_threshold())
}

/// Effective audit options after merging CLI arguments with the config file.
struct AuditOptions {
    format: OutputFormat,
    exclude_patterns: Vec<String>,
    severity_threshold: Severity,
    cvss_threshold: Option<f32>,
    ignore_rules: Vec<IgnoreRule>,
    omit_dev: bool,
}

/// Merge command-line arguments with an optional config file.
///
/// Command-line values take precedence. Built-in defaults (text format,
/// high severity threshold) yield to the config file when the flag was
/// not given. Exclude patterns and ignore rules from both sources are
/// combined.
fn resolve_options(args: &Args, config: Option<&ConfigFile>) -> Result<AuditOptions> {
    let mut format = args.format;
    let mut exclude_patterns = args.exclude.clone();
    let mut severity_threshold = args.severity_threshold;
    let mut cvss_threshold = args.cvss_threshold;
    let mut ignore_rules: Vec<IgnoreRule> = args
        .ignore
        .iter()
        .map(|id| IgnoreRule::new(id.clone(), None))
        .collect();
    let mut omit_dev = args.omit_dev;

    if let Some(config) = config {
        if format == OutputFormat::Text {
            if let Some(ref config_format) = config.format {
                format = config_format
                    .parse::<OutputFormat>()
                    .map_err(|message| AuditError::Validation { message })?;
            }
        }

        if let Some(ref config_excludes) = config.exclude_packages {
            exclude_patterns.extend(config_excludes.iter().cloned());
        }

        if severity_threshold == Severity::High {
            if let Some(ref config_threshold) = config.severity_threshold {
                severity_threshold = config_threshold
                    .parse::<Severity>()
                    .map_err(|message| AuditError::Validation { message })?;
            }
        }

        if cvss_threshold.is_none() {
            cvss_threshold = config.cvss_threshold.map(|score| score as f32);
        }

        if let Some(ref config_ignores) = config.ignore_advisories {
            ignore_rules.extend(
                config_ignores
                    .iter()
                    .map(|entry| IgnoreRule::new(entry.id.clone(), entry.reason.clone())),
            );
        }

        if !omit_dev {
            omit_dev = config.omit_dev.unwrap_or(false);
        }
    }

    Ok(AuditOptions {
        format,
        exclude_patterns,
        severity_threshold,
        cvss_threshold,
        ignore_rules,
        omit_dev,
    })
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| AuditError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    // Security check: Canonicalize path to prevent path traversal
    let canonical_path = path
        .canonicalize()
        .map_err(|e| AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: format!("Failed to canonicalize path: {}", e),
        })?;

    // Validate that the canonical path is actually a directory
    // (additional check after canonicalization)
    if !canonical_path.is_dir() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Resolved path is not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
