use crate::audit::domain::{Package, PackageVulnerabilities};
use crate::shared::Result;
use async_trait::async_trait;

/// Callback reporting (processed, total) advisory detail fetches
pub type ProgressCallback<'a> = Box<dyn Fn(usize, usize) + Send + Sync + 'a>;

/// AdvisoryRepository port for fetching vulnerability advisories
///
/// This port abstracts the advisory data source (OSV.dev in production).
/// Implementations return one entry per package that has at least one
/// known advisory; clean packages are omitted.
#[async_trait]
pub trait AdvisoryRepository {
    /// Fetches advisories for the given packages
    async fn fetch_advisories(
        &self,
        packages: Vec<Package>,
    ) -> Result<Vec<PackageVulnerabilities>>;

    /// Fetches advisories, reporting detail-fetch progress through the callback
    async fn fetch_advisories_with_progress(
        &self,
        packages: Vec<Package>,
        progress_callback: ProgressCallback<'static>,
    ) -> Result<Vec<PackageVulnerabilities>>;
}
