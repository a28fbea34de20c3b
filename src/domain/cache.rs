use super::product::Product;
use std::sync::Arc;

/// Result of a cache probe. A miss is ordinary control flow: the caller
/// falls through to the database.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Product),
    Miss,
}

impl CacheLookup {
    // ---
    pub fn into_option(self) -> Option<Product> {
        match self {
            CacheLookup::Hit(product) => Some(product),
            CacheLookup::Miss => None,
        }
    }
}

/// Id-keyed product store consulted before the database on reads.
///
/// The contract has no invalidation or eviction: once a product is `put`,
/// later updates or deletes of the underlying row are not reflected here.
/// Write paths never call into the cache. A policy with TTL or write-through
/// invalidation can be swapped in behind this trait without touching handlers.
pub trait ProductCache: Send + Sync + 'static {
    // ---
    fn get(&self, id: i64) -> CacheLookup;

    /// Install or overwrite the entry for `id`. Last writer wins.
    fn put(&self, id: i64, product: Product);

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type ProductCachePtr = Arc<dyn ProductCache>;
