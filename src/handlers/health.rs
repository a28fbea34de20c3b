use crate::app_state::AppState;
use crate::handlers::shared_types::{mark_failure, AppError};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the server.
///
/// - By default (no query parameters), performs a light check to confirm the web server
///   is running.
///
/// - If `mode=full` is passed as a query parameter, also opens a database connection
///   (with the usual connection retries) and pings PostgreSQL.
///
/// # Query Parameters
/// - `mode`: Optional. Accepts `"light"` (default) or `"full"`.
///
/// # Responses
/// - `200 OK` with `{ "status": "ok" }` if server (and PostgreSQL, in full mode) are healthy.
/// - `500 INTERNAL SERVER ERROR` with `{ "status": "error" }` if the connection or ping fails in full mode.
/// - `400 BAD REQUEST` if the query string cannot be parsed.
///
/// # Examples
/// - `GET /health` → 200 OK
/// - `GET /health?mode=full` → 200 OK or 500 INTERNAL SERVER ERROR
pub async fn health_check(
    State(state): State<AppState>,
    params: Result<Query<HealthQuery>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return AppError::BadRequest(rejection.body_text()).into_response(),
    };

    match params.mode.as_deref() {
        Some("full") => {
            // Full health check: ping PostgreSQL
            let healthy = match state.connect().await {
                Ok(mut session) => session.ping().await.is_ok(),
                Err(_) => false,
            };

            if healthy {
                (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
            } else {
                mark_failure(
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(HealthResponse { status: "error" }),
                    )
                        .into_response(),
                )
            }
        }
        _ => {
            // Light health check
            (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
        }
    }
}
