//! Request governance middleware.
//!
//! Wraps every route: the caller's IP is checked against the rate limiter
//! before any handler logic runs, and admitted requests are timed and
//! recorded. A response carrying the [`HandlerFailure`] marker counts as an
//! error.

use crate::app_state::AppState;
use crate::governance::PipelineError;
use crate::handlers::{AppError, HandlerFailure};
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

pub async fn govern_request(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    // ---
    let client = peer.ip().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let outcome = state
        .governance()
        .handle(&client, async move {
            let response = next.run(req).await;
            if response.extensions().get::<HandlerFailure>().is_some() {
                Err(response)
            } else {
                Ok(response)
            }
        })
        .await;

    match outcome {
        Ok(response) => {
            tracing::debug!(
                %client,
                %method,
                %path,
                status = response.status().as_u16(),
                "request completed"
            );
            response
        }
        Err(PipelineError::Handler(response)) => {
            tracing::debug!(
                %client,
                %method,
                %path,
                status = response.status().as_u16(),
                "request failed"
            );
            response
        }
        Err(PipelineError::Rejected(err)) => {
            tracing::info!(%client, %method, %path, "request rejected: {}", err);
            AppError::from(err).into_response()
        }
    }
}
