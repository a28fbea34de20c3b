use crate::handlers::shared_types::AppError;
use axum::http::Uri;
use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Product Catalog API 👋
Version: {version}

Available endpoints:
  - GET    /products               - List products (ordered by id)
  - GET    /products/sort/{{field}}  - List products ordered by id, name, price, quantity or created_at
  - GET    /products/{{id}}          - Fetch a product by ID (served from cache after the first read)
  - POST   /products               - Create a product (requires API token)
  - PUT    /products/{{id}}          - Update a product (requires API token)
  - DELETE /products/{{id}}          - Delete a product (requires API token)
  - GET    /health                 - Light health check
  - GET    /health?mode=full       - Full health check (includes PostgreSQL)
  - GET    /metrics                - Request counters and latency summary
  - GET    /metrics/prometheus     - Prometheus exposition (when enabled)

Every client is limited to a fixed number of requests per sliding window.
"#
    )
}

/// Fallback for paths no route matches; answers `404` as a failed request.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
