use crate::app_state::AppState;
use crate::domain::MetricsReport;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// Handler for the `/metrics` endpoint.
///
/// Returns the collector snapshot: request and error counts, average and
/// total handler time in seconds, and requests per second of uptime.
pub async fn metrics_handler(State(app_state): State<AppState>) -> Json<MetricsReport> {
    // ---
    let snapshot = app_state.governance().metrics().snapshot();
    Json(MetricsReport::from(snapshot))
}

/// Handler for the `/metrics/prometheus` endpoint.
///
/// Returns metrics in Prometheus text format for scraping. The body is empty
/// unless the Prometheus exporter is enabled.
pub async fn prometheus_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    // ---

    let metrics_text = app_state.governance().metrics().render();

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics_text,
    ))
}
