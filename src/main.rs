use anyhow::Result;
use product_catalog::{
    build_router, create_pool, create_postgres_repository, init_tracing, run_migrations,
    AppConfig, Governance,
};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber to log to stdout
    init_tracing();
    info!("Starting product catalog server...");

    let config = AppConfig::from_env()?;

    // The pool is lazy; the first real connection goes through the acquirer.
    let pool = create_pool(&config.database)?;
    let governance = Governance::from_config(&config.governance, &config.database)?;
    run_migrations(&pool, governance.acquirer()).await?;

    let app = build_router(create_postgres_repository(pool), governance, &config.auth);

    let endpoint = config.server.bind_addr;
    info!("Starting at endpoint:{}", endpoint);
    info!(
        "Starting Product Catalog API server v{}...",
        env!("CARGO_PKG_VERSION")
    );

    let listener = tokio::net::TcpListener::bind(endpoint).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
