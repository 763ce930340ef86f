/// Audit domain layer - Pure business logic and domain models
///
/// No infrastructure concerns live here: everything in this module
/// operates on in-memory values and is synchronous.
pub mod domain;
pub mod services;
