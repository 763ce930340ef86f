use crate::audit::domain::{DependencyGraph, PackageName};
use crate::shared::Result;
use std::collections::{HashMap, HashSet};

/// DependencyAnalyzer - Builds a DependencyGraph from lock file edges
///
/// Walks the logical dependency edges starting from the direct
/// dependencies, collecting the transitive closure per direct dependency.
/// The walk is cycle-safe: npm trees can contain circular dependencies.
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Analyzes dependency relationships and builds the graph
    ///
    /// # Arguments
    /// * `project_name` - Name of the audited project
    /// * `direct_dependencies` - Names declared directly by the project
    /// * `dependency_map` - Logical edges: package name -> dependency names
    pub fn analyze(
        project_name: &PackageName,
        direct_dependencies: &[String],
        dependency_map: &HashMap<String, Vec<String>>,
    ) -> Result<DependencyGraph> {
        let mut direct = Vec::new();
        for name in direct_dependencies {
            direct.push(PackageName::new(name.clone())?);
        }

        let direct_set: HashSet<&str> = direct_dependencies.iter().map(|s| s.as_str()).collect();
        let mut transitive: HashMap<PackageName, Vec<PackageName>> = HashMap::new();

        for direct_dep in direct_dependencies {
            let mut collected = Vec::new();
            let mut visited = HashSet::new();
            collect_transitive(
                direct_dep,
                dependency_map,
                &direct_set,
                &mut collected,
                &mut visited,
            );

            if !collected.is_empty() {
                let mut names = Vec::new();
                for name in collected {
                    names.push(PackageName::new(name)?);
                }
                transitive.insert(PackageName::new(direct_dep.clone())?, names);
            }
        }

        Ok(DependencyGraph::new(project_name.clone(), direct, transitive))
    }
}

fn collect_transitive(
    package_name: &str,
    dependency_map: &HashMap<String, Vec<String>>,
    direct_set: &HashSet<&str>,
    collected: &mut Vec<String>,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(package_name.to_string()) {
        return;
    }

    if let Some(deps) = dependency_map.get(package_name) {
        for dep in deps {
            // Direct dependencies get their own entry; don't double-count them
            if !direct_set.contains(dep.as_str()) && !collected.contains(dep) {
                collected.push(dep.clone());
            }
            collect_transitive(dep, dependency_map, direct_set, collected, visited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PackageName {
        PackageName::new(s.to_string()).unwrap()
    }

    fn edges(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    v.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_analyze_simple_chain() {
        let map = edges(&[("express", &["body-parser"]), ("body-parser", &["bytes"])]);
        let graph = DependencyAnalyzer::analyze(
            &name("my-app"),
            &["express".to_string()],
            &map,
        )
        .unwrap();

        assert_eq!(graph.direct_dependency_count(), 1);
        assert_eq!(graph.transitive_dependency_count(), 2);
        let trans = graph.transitive_dependencies().get(&name("express")).unwrap();
        assert!(trans.contains(&name("body-parser")));
        assert!(trans.contains(&name("bytes")));
    }

    #[test]
    fn test_analyze_excludes_direct_deps_from_transitive() {
        let map = edges(&[("a", &["b"]), ("b", &["c"])]);
        let graph = DependencyAnalyzer::analyze(
            &name("my-app"),
            &["a".to_string(), "b".to_string()],
            &map,
        )
        .unwrap();

        // "b" is direct, so it must not appear in a's transitive list
        let a_trans = graph.transitive_dependencies().get(&name("a")).unwrap();
        assert_eq!(a_trans, &vec![name("c")]);
    }

    #[test]
    fn test_analyze_handles_cycles() {
        let map = edges(&[("a", &["b"]), ("b", &["a"])]);
        let graph =
            DependencyAnalyzer::analyze(&name("my-app"), &["a".to_string()], &map).unwrap();

        let a_trans = graph.transitive_dependencies().get(&name("a")).unwrap();
        assert_eq!(a_trans, &vec![name("b")]);
    }

    #[test]
    fn test_analyze_no_dependencies() {
        let graph =
            DependencyAnalyzer::analyze(&name("my-app"), &[], &HashMap::new()).unwrap();
        assert_eq!(graph.direct_dependency_count(), 0);
        assert_eq!(graph.transitive_dependency_count(), 0);
    }

    #[test]
    fn test_analyze_leaf_direct_dependency() {
        let graph = DependencyAnalyzer::analyze(
            &name("my-app"),
            &["ms".to_string()],
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(graph.direct_dependency_count(), 1);
        assert!(graph.transitive_dependencies().is_empty());
    }
}
