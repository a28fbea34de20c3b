use super::product::{NewProduct, Product, ProductUpdate, SortKey};
use anyhow::Result;
use std::sync::Arc;

/// Abstraction for product persistence.
///
/// `connect` is the only connection-establishment primitive; the
/// connection acquirer retries it, never the operations on the session.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Open (or check out) one database connection.
    async fn connect(&self) -> Result<Box<dyn ProductSession>>;
}

/// Operations available on one open connection.
///
/// Writes run inside a transaction that is rolled back before any error is
/// returned. Reads are executed directly.
#[async_trait::async_trait]
pub trait ProductSession: Send {
    // ---
    /// Round-trip to the database.
    async fn ping(&mut self) -> Result<()>;

    /// All products ordered ascending by `sort`.
    async fn list_products(&mut self, sort: SortKey) -> Result<Vec<Product>>;

    /// Get product by ID.
    async fn get_product(&mut self, id: i64) -> Result<Option<Product>>;

    /// Insert a new product and return the stored row.
    async fn create_product(&mut self, product: NewProduct) -> Result<Product>;

    /// Replace the mutable fields of a product. `None` if no such row.
    async fn update_product(&mut self, id: i64, update: ProductUpdate) -> Result<Option<Product>>;

    /// Delete a product. `false` if no such row.
    async fn delete_product(&mut self, id: i64) -> Result<bool>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
