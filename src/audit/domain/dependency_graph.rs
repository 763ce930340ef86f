use super::PackageName;
use std::collections::HashMap;

/// DependencyGraph aggregate representing the audited dependency structure
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    project_name: PackageName,
    direct_dependencies: Vec<PackageName>,
    transitive_dependencies: HashMap<PackageName, Vec<PackageName>>,
}

impl DependencyGraph {
    pub fn new(
        project_name: PackageName,
        direct_dependencies: Vec<PackageName>,
        transitive_dependencies: HashMap<PackageName, Vec<PackageName>>,
    ) -> Self {
        Self {
            project_name,
            direct_dependencies,
            transitive_dependencies,
        }
    }

    pub fn project_name(&self) -> &PackageName {
        &self.project_name
    }

    pub fn direct_dependencies(&self) -> &[PackageName] {
        &self.direct_dependencies
    }

    pub fn transitive_dependencies(&self) -> &HashMap<PackageName, Vec<PackageName>> {
        &self.transitive_dependencies
    }

    pub fn direct_dependency_count(&self) -> usize {
        self.direct_dependencies.len()
    }

    pub fn transitive_dependency_count(&self) -> usize {
        self.transitive_dependencies.values().map(|v| v.len()).sum()
    }
}
