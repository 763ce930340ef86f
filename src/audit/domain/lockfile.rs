use crate::audit::domain::Package;
use crate::shared::Result;
use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Parsed view of a package-lock.json file
#[derive(Debug, Clone)]
pub struct LockfileParseResult {
    /// Deduplicated resolved packages, root project entry excluded
    pub packages: Vec<Package>,
    /// Direct dependency names declared by the root entry (empty for v1 lock files)
    pub direct_dependencies: Vec<String>,
    /// Logical dependency edges: package name -> names it depends on
    pub dependency_map: HashMap<String, Vec<String>>,
    /// The lock file's declared lockfileVersion
    pub lockfile_version: u64,
}

#[derive(Debug, Deserialize)]
struct NpmLock {
    #[serde(default, rename = "lockfileVersion")]
    lockfile_version: u64,
    /// Flat entries keyed by install path ("" = root, "node_modules/x") - lockfileVersion 2/3
    #[serde(default)]
    packages: Option<BTreeMap<String, LockEntry>>,
    /// Nested tree keyed by package name - lockfileVersion 1
    #[serde(default)]
    dependencies: Option<BTreeMap<String, V1Entry>>,
}

#[derive(Debug, Deserialize)]
struct LockEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    dev: bool,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    dependencies: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct V1Entry {
    version: String,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    dev: bool,
    #[serde(default)]
    requires: Option<BTreeMap<String, String>>,
    #[serde(default)]
    dependencies: Option<BTreeMap<String, V1Entry>>,
}

/// Checks for resolved versions that cannot be matched against advisories
/// (git refs, tarball URLs, local paths, workspace links).
fn is_non_registry_version(version: &str) -> bool {
    let v = version.trim();
    v.starts_with("git+")
        || v.starts_with("git://")
        || v.starts_with("file:")
        || v.starts_with("link:")
        || v.starts_with("workspace:")
        || v.starts_with("npm:")
        || v.starts_with("github:")
        || v.contains("://")
        || v == "."
        || v.starts_with("./")
        || v.starts_with("../")
}

/// Extracts the package name from a lockfileVersion 2/3 install path.
///
/// Keys look like "node_modules/lodash" or, for nested installs,
/// "node_modules/a/node_modules/@scope/b" - the name is everything after
/// the last "node_modules/" segment.
fn name_from_install_path(key: &str) -> Option<&str> {
    key.rsplit_once("node_modules/").map(|(_, name)| name)
}

/// Parses a package-lock.json document (lockfileVersion 1, 2, or 3).
///
/// Returns the deduplicated package list, the root entry's direct
/// dependencies, and the logical dependency edges between packages.
pub fn parse_lockfile(content: &str) -> Result<LockfileParseResult> {
    let lock: NpmLock =
        serde_json::from_str(content).context("Failed to parse package-lock.json")?;

    let mut packages = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut direct_dependencies = Vec::new();
    let mut dependency_map: HashMap<String, Vec<String>> = HashMap::new();

    // lockfileVersion 2/3: flat "packages" map keyed by install path
    if let Some(entries) = &lock.packages {
        for (key, entry) in entries {
            if key.is_empty() {
                // Root project entry: declares the direct dependencies
                if let Some(deps) = &entry.dependencies {
                    direct_dependencies.extend(deps.keys().cloned());
                }
                if let Some(dev_deps) = &entry.dev_dependencies {
                    direct_dependencies.extend(dev_deps.keys().cloned());
                }
                continue;
            }

            // Workspace links resolve to local paths, nothing to audit
            if entry.link {
                continue;
            }

            let Some(version) = entry.version.as_deref() else {
                continue;
            };
            if is_non_registry_version(version) {
                continue;
            }

            // Aliased installs carry the real package name in the "name" field
            let name = match entry.name.as_deref() {
                Some(name) => name,
                None => name_from_install_path(key).unwrap_or(key.as_str()),
            };

            if seen.insert((name.to_string(), version.to_string())) {
                packages.push(Package::with_metadata(
                    name.to_string(),
                    version.to_string(),
                    entry.integrity.clone(),
                    entry.dev,
                )?);
            }

            if let Some(deps) = &entry.dependencies {
                dependency_map
                    .entry(name.to_string())
                    .or_default()
                    .extend(deps.keys().cloned());
            }
        }
    }

    // lockfileVersion 1: nested "dependencies" tree
    if lock.packages.is_none() {
        if let Some(deps) = &lock.dependencies {
            collect_v1_entries(deps, &mut packages, &mut seen, &mut dependency_map)?;
        }
    }

    if lock.packages.is_none() && lock.dependencies.is_none() {
        anyhow::bail!(
            "package-lock.json contains neither a 'packages' nor a 'dependencies' section"
        );
    }

    Ok(LockfileParseResult {
        packages,
        direct_dependencies,
        dependency_map,
        lockfile_version: lock.lockfile_version,
    })
}

fn collect_v1_entries(
    deps: &BTreeMap<String, V1Entry>,
    packages: &mut Vec<Package>,
    seen: &mut HashSet<(String, String)>,
    dependency_map: &mut HashMap<String, Vec<String>>,
) -> Result<()> {
    for (name, entry) in deps {
        if !is_non_registry_version(&entry.version)
            && seen.insert((name.clone(), entry.version.clone()))
        {
            packages.push(Package::with_metadata(
                name.clone(),
                entry.version.clone(),
                entry.integrity.clone(),
                entry.dev,
            )?);
        }

        // "requires" holds the logical edges; "dependencies" is the nested physical tree
        if let Some(requires) = &entry.requires {
            dependency_map
                .entry(name.clone())
                .or_default()
                .extend(requires.keys().cloned());
        }

        if let Some(nested) = &entry.dependencies {
            collect_v1_entries(nested, packages, seen, dependency_map)?;
        }
    }
    Ok(())
}
