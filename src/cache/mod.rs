pub mod key;
pub mod response_cache;

pub use key::RequestKey;
pub use response_cache::{CacheEntry, ResponseCache, DEFAULT_TTL};
