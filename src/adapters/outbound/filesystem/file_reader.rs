use crate::audit::domain::{parse_lockfile, LockfileParseResult};
use crate::ports::outbound::{LockfileReader, ManifestReader, ProjectManifest};
use crate::shared::error::AuditError;
use crate::shared::security::{validate_file_size, validate_regular_file, MAX_FILE_SIZE};
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// FileSystemReader adapter for reading files from the file system
///
/// This adapter implements both the LockfileReader and ManifestReader
/// ports, providing file system access for package-lock.json and
/// package.json.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    /// Safely read a file with security checks:
    /// - Reject symbolic links
    /// - Check file size limits
    /// - Validate file is a regular file
    fn safe_read_file(&self, path: &Path, file_type: &str) -> Result<String> {
        validate_regular_file(path, file_type)?;

        let metadata = fs::symlink_metadata(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_type, e))?;
        validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

        // Safe to read the file now
        fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_type, e))
    }
}

impl LockfileReader for FileSystemReader {
    fn read_and_parse_lockfile(&self, project_path: &Path) -> Result<LockfileParseResult> {
        let lockfile_path = project_path.join("package-lock.json");

        // Check if package-lock.json exists
        if !lockfile_path.exists() {
            return Err(AuditError::LockfileNotFound {
                path: lockfile_path.clone(),
                suggestion: format!(
                    "package-lock.json does not exist in project directory \"{}\".\n   \
                     Please run 'npm install' in the root directory of an npm project, \
                     or specify the correct path with the --path option.",
                    project_path.display()
                ),
            }
            .into());
        }

        let content = self
            .safe_read_file(&lockfile_path, "package-lock.json")
            .map_err(|e| AuditError::FileReadError {
                path: lockfile_path.clone(),
                details: e.to_string(),
            })?;

        parse_lockfile(&content).map_err(|e| {
            AuditError::LockfileParseError {
                path: lockfile_path,
                details: e.to_string(),
            }
            .into()
        })
    }
}

/// Minimal view of package.json for project metadata
#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "devDependencies", default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl ManifestReader for FileSystemReader {
    fn read_manifest(&self, project_path: &Path) -> Result<ProjectManifest> {
        let manifest_path = project_path.join("package.json");

        if !manifest_path.exists() {
            anyhow::bail!("package.json not found in project directory");
        }

        // Read with security checks
        let manifest_content = self.safe_read_file(&manifest_path, "package.json")?;

        let manifest: PackageJson = serde_json::from_str(&manifest_content)
            .map_err(|e| anyhow::anyhow!("Failed to parse package.json: {}", e))?;

        let name = manifest
            .name
            .ok_or_else(|| anyhow::anyhow!("Project name not found in package.json"))?;

        // BTreeMap keeps the declared dependency names sorted
        let direct_dependencies = manifest
            .dependencies
            .keys()
            .chain(manifest.dev_dependencies.keys())
            .cloned()
            .collect();

        Ok(ProjectManifest {
            name,
            direct_dependencies,
        })
    }
}
