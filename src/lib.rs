//! lockcheck - Dependency audit tool for npm lock files
//!
//! This library audits package-lock.json files against the OSV.dev
//! advisory database, following hexagonal architecture principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`audit`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use lockcheck::prelude::*;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Create adapters
//! let lockfile_reader = FileSystemReader::new();
//! let manifest_reader = FileSystemReader::new();
//! let advisory_repository = CachingAdvisoryRepository::new(OsvClient::new()?);
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = RunAuditUseCase::new(
//!     lockfile_reader,
//!     manifest_reader,
//!     advisory_repository,
//!     progress_reporter,
//! );
//!
//! // Execute
//! let request = AuditRequest::new(PathBuf::from("."));
//! let response = use_case.execute(request).await?;
//!
//! // Format output
//! let formatter = TextFormatter::new();
//! let output = formatter.format(response.report())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod audit;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        JsonFormatter, MarkdownFormatter, TextFormatter,
    };
    pub use crate::adapters::outbound::network::{CachingAdvisoryRepository, OsvClient};
    pub use crate::application::dto::{AuditRequest, AuditResponse, OutputFormat};
    pub use crate::application::factories::FormatterFactory;
    pub use crate::application::use_cases::{FetchAdvisoriesUseCase, RunAuditUseCase};
    pub use crate::audit::domain::{
        AuditReport, DependencyGraph, Package, PackageName, Severity,
    };
    pub use crate::audit::services::{IgnoreRule, ThresholdPolicy};
    pub use crate::ports::outbound::{
        AdvisoryRepository, LockfileReader, ManifestReader, OutputPresenter, ProgressReporter,
        ReportFormatter,
    };
    pub use crate::shared::error::ExitCode;
    pub use crate::shared::Result;
}
