mod acquirer;
mod postgres_repository;


pub use acquirer::{ConnectionAcquirer, RetryPolicy};
pub use postgres_repository::{create_pool, create_postgres_repository, PostgresRepository};

use anyhow::Result;
use sqlx::PgPool;

/// Applies the bundled schema migrations.
///
/// The migration connection is obtained through `acquirer`, so a database
/// that is still starting up gets the same retry budget as a request would.
pub async fn run_migrations(pool: &PgPool, acquirer: &ConnectionAcquirer) -> Result<()> {
    // ---
    let mut conn = acquirer.acquire(|| pool.acquire()).await?;

    sqlx::migrate!("./migrations").run(&mut *conn).await?;

    tracing::info!("Database migrations applied");
    Ok(())
}
