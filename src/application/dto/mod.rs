/// Data Transfer Objects for the application layer
pub mod audit_request;
pub mod audit_response;
pub mod output_format;

pub use audit_request::AuditRequest;
pub use audit_response::AuditResponse;
pub use output_format::OutputFormat;
