mod unbounded_cache;

pub use unbounded_cache::UnboundedProductCache;
use std::sync::Arc;

/// Creates the in-process product cache.
pub fn create() -> crate::domain::ProductCachePtr {
    Arc::new(UnboundedProductCache::new())
}
