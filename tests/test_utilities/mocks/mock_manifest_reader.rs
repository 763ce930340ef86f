use lockcheck::ports::outbound::ProjectManifest;
use lockcheck::prelude::*;
use std::path::Path;

/// Mock ManifestReader for testing
pub struct MockManifestReader {
    pub project_name: String,
    pub direct_dependencies: Vec<String>,
    pub should_fail: bool,
}

impl MockManifestReader {
    pub fn new(project_name: String) -> Self {
        Self {
            project_name,
            direct_dependencies: Vec::new(),
            should_fail: false,
        }
    }

    pub fn with_direct_dependencies(mut self, names: Vec<String>) -> Self {
        self.direct_dependencies = names;
        self
    }

    pub fn with_failure() -> Self {
        Self {
            project_name: String::new(),
            direct_dependencies: Vec::new(),
            should_fail: true,
        }
    }
}

impl ManifestReader for MockManifestReader {
    fn read_manifest(&self, _project_path: &Path) -> Result<ProjectManifest> {
        if self.should_fail {
            anyhow::bail!("Mock manifest read failure");
        }
        Ok(ProjectManifest {
            name: self.project_name.clone(),
            direct_dependencies: self.direct_dependencies.clone(),
        })
    }
}
