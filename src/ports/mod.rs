/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports are the driven interfaces the application core uses
/// to reach infrastructure (file system, network, console).
pub mod outbound;
