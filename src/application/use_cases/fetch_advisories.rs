use crate::audit::domain::{Package, PackageVulnerabilities};
use crate::ports::outbound::AdvisoryRepository;
use crate::shared::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// FetchAdvisoriesUseCase - Use case for fetching vulnerability advisories
///
/// This use case provides advisory fetching functionality with progress
/// reporting. It encapsulates the progress bar display logic and delegates
/// to the AdvisoryRepository for the actual fetching.
///
/// # Type Parameters
/// * `R` - AdvisoryRepository implementation
pub struct FetchAdvisoriesUseCase<R: AdvisoryRepository> {
    advisory_repository: R,
}

impl<R: AdvisoryRepository> FetchAdvisoriesUseCase<R> {
    /// Creates a new FetchAdvisoriesUseCase with injected repository
    pub fn new(advisory_repository: R) -> Self {
        Self {
            advisory_repository,
        }
    }

    /// Fetches advisories for packages with progress bar display
    ///
    /// The progress bar shows a spinner during the batch query phase and
    /// a progress bar during individual advisory detail fetching.
    ///
    /// # Arguments
    /// * `packages` - Packages to look up in the advisory database
    ///
    /// # Returns
    /// Vector of PackageVulnerabilities for packages that have advisories
    pub async fn fetch_with_progress(
        &self,
        packages: Vec<Package>,
    ) -> Result<Vec<PackageVulnerabilities>> {
        // Atomic counters for thread-safe progress sharing
        let progress_current = Arc::new(AtomicUsize::new(0));
        let progress_total = Arc::new(AtomicUsize::new(0));
        let is_done = Arc::new(AtomicBool::new(false));

        let current_clone = progress_current.clone();
        let total_clone = progress_total.clone();
        let done_clone = is_done.clone();

        // Spawn a thread to update the progress bar
        let progress_handle = thread::spawn(move || {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} - {msg}")
                    .expect("Failed to set progress bar template")
                    .progress_chars("=>-"),
            );
            pb.set_message("Fetching advisory details...");

            // Poll for updates until done
            while !done_clone.load(Ordering::Relaxed) {
                let current = current_clone.load(Ordering::Relaxed);
                let total = total_clone.load(Ordering::Relaxed);

                if total > 0 {
                    pb.set_length(total as u64);
                    pb.set_position(current as u64);
                } else {
                    // Still in batch query phase - show spinner
                    pb.tick();
                }

                thread::sleep(Duration::from_millis(50));
            }

            pb.finish_and_clear();
        });

        // Progress callback that updates the atomic counters
        let progress_callback: Box<dyn Fn(usize, usize) + Send + Sync> =
            Box::new(move |current: usize, total: usize| {
                progress_current.store(current, Ordering::Relaxed);
                progress_total.store(total, Ordering::Relaxed);
            });

        let advisories = self
            .advisory_repository
            .fetch_advisories_with_progress(packages, progress_callback)
            .await?;

        // Signal completion and wait for the progress bar thread
        is_done.store(true, Ordering::Relaxed);
        let _ = progress_handle.join();

        Ok(advisories)
    }

    /// Returns (total advisories, affected package count)
    pub fn summarize(advisories: &[PackageVulnerabilities]) -> (usize, usize) {
        let total_advisories: usize = advisories.iter().map(|v| v.vulnerabilities().len()).sum();
        let affected_packages = advisories.len();
        (total_advisories, affected_packages)
    }
}
