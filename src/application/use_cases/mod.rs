/// Use cases for the application layer
pub mod fetch_advisories;
pub mod run_audit;

pub use fetch_advisories::FetchAdvisoriesUseCase;
pub use run_audit::RunAuditUseCase;
