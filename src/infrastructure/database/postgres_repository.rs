use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Postgres, Transaction};

use crate::config::DatabaseConfig;
use crate::domain::{
    NewProduct, Product, ProductSession, ProductUpdate, Repository, RepositoryPtr, SortKey,
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, quantity, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        // ---
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            quantity: r.quantity,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Builds a lazily connected pool from configuration.
///
/// No connection is opened here; the first `acquire` does that, which is
/// where the connection acquirer's retries apply.
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy(&config.database_url)?;

    Ok(pool)
}

pub fn create_postgres_repository(pool: PgPool) -> RepositoryPtr {
    // ---
    std::sync::Arc::new(PostgresRepository::new(pool))
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn connect(&self) -> Result<Box<dyn ProductSession>> {
        // ---
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PostgresSession { conn }))
    }
}

/// One pooled connection checked out for the duration of a request.
pub struct PostgresSession {
    // ---
    conn: PoolConnection<Postgres>,
}

/// Commits on success; rolls back before surfacing any failure.
async fn finish<T>(tx: Transaction<'_, Postgres>, result: sqlx::Result<T>) -> Result<T> {
    // ---
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            tracing::error!("Product write failed, rolling back: {}", err);
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
            Err(err.into())
        }
    }
}

#[async_trait::async_trait]
impl ProductSession for PostgresSession {
    // ---
    async fn ping(&mut self) -> Result<()> {
        // ---
        self.conn.ping().await?;
        Ok(())
    }

    async fn list_products(&mut self, sort: SortKey) -> Result<Vec<Product>> {
        // ---
        // `SortKey::column` only yields fixed column names.
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {} ASC, id ASC",
            sort.column()
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&mut self, id: i64) -> Result<Option<Product>> {
        // ---
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn create_product(&mut self, product: NewProduct) -> Result<Product> {
        // ---
        let mut tx = self.conn.begin().await?;

        let result = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, price, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .fetch_one(&mut *tx)
        .await;

        finish(tx, result).await.map(Product::from)
    }

    async fn update_product(&mut self, id: i64, update: ProductUpdate) -> Result<Option<Product>> {
        // ---
        let mut tx = self.conn.begin().await?;

        let result = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET name = $1, description = $2, price = $3, quantity = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.quantity)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;

        Ok(finish(tx, result).await?.map(Product::from))
    }

    async fn delete_product(&mut self, id: i64) -> Result<bool> {
        // ---
        let mut tx = self.conn.begin().await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await;

        Ok(finish(tx, result).await?.rows_affected() > 0)
    }
}
