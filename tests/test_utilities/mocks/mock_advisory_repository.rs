use async_trait::async_trait;
use lockcheck::audit::domain::{
    CvssScore, Package, PackageVulnerabilities, Severity, Vulnerability,
};
use lockcheck::ports::outbound::ProgressCallback;
use lockcheck::prelude::*;
use std::collections::HashMap;

/// Mock AdvisoryRepository for testing
///
/// Advisories are keyed by "name@version". Packages without an entry
/// are treated as clean.
#[derive(Clone)]
pub struct MockAdvisoryRepository {
    pub advisories: HashMap<String, Vec<Vulnerability>>,
    pub should_fail: bool,
}

impl MockAdvisoryRepository {
    pub fn new() -> Self {
        Self {
            advisories: HashMap::new(),
            should_fail: false,
        }
    }

    pub fn with_advisory(
        mut self,
        package: &str,
        version: &str,
        advisory_id: &str,
        severity: Severity,
        cvss: Option<f32>,
    ) -> Self {
        let vulnerability = Vulnerability::new(
            advisory_id.to_string(),
            cvss.map(|score| CvssScore::new(score).unwrap()),
            severity,
            None,
            None,
        )
        .unwrap();
        self.advisories
            .entry(format!("{}@{}", package, version))
            .or_default()
            .push(vulnerability);
        self
    }

    pub fn with_failure() -> Self {
        Self {
            advisories: HashMap::new(),
            should_fail: true,
        }
    }

    fn lookup(&self, packages: &[Package]) -> Vec<PackageVulnerabilities> {
        packages
            .iter()
            .filter_map(|package| {
                let key = format!("{}@{}", package.name(), package.version());
                self.advisories.get(&key).map(|vulns| {
                    PackageVulnerabilities::new(
                        package.name().to_string(),
                        package.version().to_string(),
                        vulns.clone(),
                    )
                })
            })
            .collect()
    }
}

impl Default for MockAdvisoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdvisoryRepository for MockAdvisoryRepository {
    async fn fetch_advisories(&self, packages: Vec<Package>) -> Result<Vec<PackageVulnerabilities>> {
        if self.should_fail {
            anyhow::bail!("Mock advisory repository failure");
        }
        Ok(self.lookup(&packages))
    }

    async fn fetch_advisories_with_progress(
        &self,
        packages: Vec<Package>,
        progress_callback: ProgressCallback<'static>,
    ) -> Result<Vec<PackageVulnerabilities>> {
        if self.should_fail {
            anyhow::bail!("Mock advisory repository failure");
        }
        let results = self.lookup(&packages);
        progress_callback(results.len(), results.len());
        Ok(results)
    }
}
