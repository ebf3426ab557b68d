//! In-memory pool object cache.

mod pool_cache;

pub use pool_cache::{PoolCache, SharedPoolCache, DEFAULT_CACHE_CAPACITY};
