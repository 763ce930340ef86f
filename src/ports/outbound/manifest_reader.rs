use crate::shared::Result;
use std::path::Path;

/// Project metadata read from package.json
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    /// The "name" field of package.json
    pub name: String,
    /// Names listed under "dependencies" and "devDependencies"
    pub direct_dependencies: Vec<String>,
}

/// ManifestReader port for reading project configuration
///
/// This port abstracts the file system operations needed to read
/// project metadata from the npm manifest (package.json).
pub trait ManifestReader {
    /// Reads the project manifest from the project directory
    ///
    /// # Errors
    /// Returns an error if:
    /// - package.json does not exist
    /// - The file cannot be parsed
    /// - The "name" field is missing
    fn read_manifest(&self, project_path: &Path) -> Result<ProjectManifest>;
}
