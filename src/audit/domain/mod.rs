pub mod dependency_graph;
pub mod lockfile;
pub mod package;
pub mod report;
pub mod vulnerability;

pub use dependency_graph::DependencyGraph;
pub use lockfile::{parse_lockfile, LockfileParseResult};
pub use package::{Package, PackageName};
pub use report::{AuditMetadata, AuditReport, AuditSummary, IgnoredFinding};
pub use vulnerability::{CvssScore, PackageVulnerabilities, Severity, Vulnerability};
