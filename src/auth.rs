//! Placeholder authorization for write endpoints.
//!
//! Compares an `Authorization: Bearer <token>` header against the single
//! configured API token. There are no users, sessions or token issuance.

use crate::app_state::AppState;
use crate::handlers::AppError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Extractor that only succeeds when the request carries the API token.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiToken;

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    // ---
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for RequireApiToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // ---
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        match token {
            Some(token) if token == state.api_token() => Ok(RequireApiToken),
            Some(_) => {
                tracing::warn!("Rejected write request with invalid API token");
                Err(AppError::Unauthorized)
            }
            None => Err(AppError::Unauthorized),
        }
    }
}
