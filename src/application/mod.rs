/// Application layer - Use cases, DTOs, and factories
///
/// This layer orchestrates the audit workflow, wiring domain services
/// to the outbound ports without knowing concrete infrastructure.
pub mod dto;
pub mod factories;
pub mod use_cases;
