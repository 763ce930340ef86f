/// Adapters module - Infrastructure implementations of the outbound ports
pub mod outbound;
