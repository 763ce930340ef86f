/// Outbound adapters - Driven side implementations
///
/// These adapters implement the outbound ports, providing concrete
/// infrastructure (file system, network, console, formatting).
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
