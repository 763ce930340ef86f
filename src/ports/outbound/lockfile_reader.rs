use crate::audit::domain::LockfileParseResult;
use crate::shared::Result;
use std::path::Path;

/// LockfileReader port for reading and parsing the dependency lock file
///
/// This port abstracts the file system operations needed to load
/// package-lock.json from a project directory.
pub trait LockfileReader {
    /// Reads and parses package-lock.json from the project directory
    ///
    /// # Arguments
    /// * `project_path` - Path to the project directory
    ///
    /// # Errors
    /// Returns an error if:
    /// - The package-lock.json file does not exist
    /// - The file cannot be read due to permissions or I/O errors
    /// - The file is not a valid npm lock file
    fn read_and_parse_lockfile(&self, project_path: &Path) -> Result<LockfileParseResult>;
}
