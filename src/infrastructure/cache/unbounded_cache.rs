//! Read-through product cache with no eviction.
//!
//! KNOWN STALENESS HAZARD: entries are only ever written after a successful
//! read. Update and delete handlers do not touch this cache, so a product that
//! was read once keeps being served in its old form after it is modified or
//! removed in the database, for the lifetime of the process. There is also no
//! capacity limit, TTL or LRU policy.

use crate::domain::{CacheLookup, Product, ProductCache};
use dashmap::DashMap;

#[derive(Default)]
pub struct UnboundedProductCache {
    entries: DashMap<i64, Product>,
}

impl UnboundedProductCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductCache for UnboundedProductCache {
    // ---
    fn get(&self, id: i64) -> CacheLookup {
        // ---
        match self.entries.get(&id) {
            Some(entry) => {
                tracing::debug!(product_id = id, "product cache hit");
                CacheLookup::Hit(entry.value().clone())
            }
            None => {
                tracing::debug!(product_id = id, "product cache miss");
                CacheLookup::Miss
            }
        }
    }

    fn put(&self, id: i64, product: Product) {
        self.entries.insert(id, product);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
