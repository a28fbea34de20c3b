// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{middleware::from_fn_with_state, routing::get, Router};

use handlers::*;

// Public exports (visible outside this module)
pub mod domain;
pub mod governance;

// Internal-only exports (sibling access within this module)
mod app_state;
mod auth;
mod config;
mod handlers;
mod infrastructure;
mod middleware;

pub use config::*;
pub use governance::{Governance, PipelineError};

// Publicly expose the infrastructure building blocks
pub use infrastructure::{
    cache::UnboundedProductCache, // ---
    create_collector_metrics,
    create_pool,
    create_postgres_repository,
    create_prom_metrics,
    database::{ConnectionAcquirer, RetryPolicy},
    rate_limit::{RateLimitConfig, SlidingLogRateLimiter},
    run_migrations,
};

/// Initializes the global tracing subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    // ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok(); // Ignores if already initialized
}

/// Build the HTTP router with all dependencies derived from environment variables.
///
/// The database pool connects lazily, so this succeeds without a reachable
/// database; requests then go through the connection acquirer.
pub fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    init_tracing();

    // Create infrastructure dependencies
    let pool = create_pool(&config.database)?;
    let repository = create_postgres_repository(pool);
    let governance = Governance::from_config(&config.governance, &config.database)?;

    Ok(build_router(repository, governance, &config.auth))
}

/// Build the HTTP router from explicit dependencies.
///
/// Every route sits behind the governance middleware (rate limiting, then
/// request metrics). Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the caller
/// address is available as the rate-limit key.
pub fn build_router(
    repository: domain::RepositoryPtr,
    governance: Governance,
    auth: &AuthConfig,
) -> Router {
    // ---
    let app_state = AppState::new(repository, governance, auth);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/metrics/prometheus", get(prometheus_handler))
        .route("/products", get(list_products).post(create_product))
        .route("/products/sort/{field}", get(sorted_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .fallback(not_found_handler)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::govern_request,
        ))
        .with_state(app_state)
}
