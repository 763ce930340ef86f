pub mod caching_osv_client;
pub mod osv_client;

pub use caching_osv_client::CachingAdvisoryRepository;
pub use osv_client::OsvClient;
