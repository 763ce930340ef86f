use crate::audit::domain::vulnerability::{PackageVulnerabilities, Vulnerability};
use crate::audit::domain::Package;
use crate::ports::outbound::{AdvisoryRepository, ProgressCallback};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingAdvisoryRepository - Caching decorator for an AdvisoryRepository
///
/// Caches advisory lookups per package@version so repeated runs in the
/// same process (and repeated packages within one run) hit the network
/// only once. An empty cached entry means the package is known clean.
///
/// The cache is shared across clones, so the decorator stays cheap to
/// clone for use-case injection.
pub struct CachingAdvisoryRepository<R> {
    inner: R,
    cache: Arc<DashMap<String, Vec<Vulnerability>>>,
}

impl<R> Clone for CachingAdvisoryRepository<R>
where
    R: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<R> CachingAdvisoryRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    fn cache_key(package: &Package) -> String {
        format!("{}@{}", package.name(), package.version())
    }

    /// Number of cached package lookups (for diagnostics)
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R> AdvisoryRepository for CachingAdvisoryRepository<R>
where
    R: AdvisoryRepository + Send + Sync,
{
    async fn fetch_advisories(
        &self,
        packages: Vec<Package>,
    ) -> Result<Vec<PackageVulnerabilities>> {
        self.fetch_advisories_with_progress(packages, Box::new(|_, _| {}))
            .await
    }

    async fn fetch_advisories_with_progress(
        &self,
        packages: Vec<Package>,
        progress_callback: ProgressCallback<'static>,
    ) -> Result<Vec<PackageVulnerabilities>> {
        let mut results = Vec::new();
        let mut misses = Vec::new();

        for package in packages {
            match self.cache.get(&Self::cache_key(&package)) {
                Some(cached) => {
                    if !cached.is_empty() {
                        results.push(PackageVulnerabilities::new(
                            package.name().to_string(),
                            package.version().to_string(),
                            cached.clone(),
                        ));
                    }
                }
                None => misses.push(package),
            }
        }

        if misses.is_empty() {
            return Ok(results);
        }

        let fetched = self
            .inner
            .fetch_advisories_with_progress(misses.clone(), progress_callback)
            .await?;

        // Cache every queried package, including the clean ones
        for package in &misses {
            self.cache
                .entry(Self::cache_key(package))
                .or_insert_with(Vec::new);
        }
        for pkg_vulns in &fetched {
            let key = format!(
                "{}@{}",
                pkg_vulns.package_name(),
                pkg_vulns.package_version()
            );
            self.cache.insert(key, pkg_vulns.vulnerabilities().to_vec());
        }

        results.extend(fetched);
        Ok(results)
    }
}
