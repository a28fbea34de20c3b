use crate::domain::GovernanceError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wrapper type for successful API responses.
///
/// Encapsulates the data payload and prepares it for JSON serialization.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

/// Response extension marking a failed handler outcome.
///
/// The governance middleware counts a response carrying this marker as an
/// error, independent of its status code.
#[derive(Debug, Clone, Copy)]
pub struct HandlerFailure;

/// Tags `response` as a failed handler outcome.
pub fn mark_failure(mut response: Response) -> Response {
    response.extensions_mut().insert(HandlerFailure);
    response
}

/// Every failure a handler can signal.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Governance(GovernanceError),
    Persistence(anyhow::Error),
}

impl From<GovernanceError> for AppError {
    fn from(err: GovernanceError) -> Self {
        AppError::Governance(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Persistence(err)
    }
}

/// Whole seconds a client should wait, never zero.
fn retry_after_secs(retry_after: std::time::Duration) -> u64 {
    // ---
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // ---
        let mut retry_after = None;

        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid API token".to_string(),
            ),
            AppError::Governance(GovernanceError::RateLimited {
                retry_after: wait, ..
            }) => {
                retry_after = Some(retry_after_secs(wait));
                (StatusCode::TOO_MANY_REQUESTS, "Too many requests".to_string())
            }
            AppError::Governance(err @ GovernanceError::ConnectionUnavailable { .. }) => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database unavailable".to_string(),
                )
            }
            AppError::Persistence(err) => {
                tracing::error!("Persistence error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        mark_failure(response)
    }
}
