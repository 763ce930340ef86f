/// Factories for assembling infrastructure at the application boundary
pub mod formatter_factory;

pub use formatter_factory::FormatterFactory;
