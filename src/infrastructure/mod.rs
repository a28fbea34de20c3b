pub mod cache;
pub mod database;
pub mod metrics;
pub mod rate_limit;

// Re-export the factory functions for easy access
pub use database::{create_pool, create_postgres_repository, run_migrations};
pub use metrics::{create_collector_metrics, create_prom_metrics};
