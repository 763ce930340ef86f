mod dependency_analyzer;
mod package_filter;
mod threshold_policy;

pub use dependency_analyzer::DependencyAnalyzer;
pub use package_filter::PackageFilter;
pub use threshold_policy::{IgnoreRule, ThresholdEvaluation, ThresholdPolicy};
