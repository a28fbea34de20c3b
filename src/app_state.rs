//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains the
//! product repository, the request governance service and the write-endpoint
//! token.
//!
//! The state is cheaply cloneable (everything heavy sits behind an `Arc`) so
//! it can be handed to each request without copying resources.

use crate::config::AuthConfig;
use crate::domain::{GovernanceError, ProductSession, RepositoryPtr};
use crate::governance::Governance;
use std::sync::Arc;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the application.
///
/// # Lifecycle
///
/// 1. Created once in `create_router()` (or `build_router()` in tests)
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub(crate) struct AppState {
    /// Product persistence. Connections are opened per request through
    /// [`AppState::connect`], never held in the state itself.
    repository: RepositoryPtr,

    /// Metrics, rate limiter, product cache and connection acquirer.
    governance: Governance,

    /// Static bearer token for write endpoints.
    api_token: Arc<str>,
}

impl AppState {
    // ---

    pub fn new(repository: RepositoryPtr, governance: Governance, auth: &AuthConfig) -> Self {
        // ---
        AppState {
            repository,
            governance,
            api_token: Arc::from(auth.api_token.as_str()),
        }
    }

    /// Opens a database connection through the connection acquirer.
    ///
    /// Retries according to the configured policy and fails with
    /// [`GovernanceError::ConnectionUnavailable`] once it is exhausted.
    pub(crate) async fn connect(&self) -> Result<Box<dyn ProductSession>, GovernanceError> {
        // ---
        let repository = &self.repository;
        self.governance
            .acquirer()
            .acquire(move || repository.connect())
            .await
    }

    /// Get a reference to the governance service.
    pub(crate) fn governance(&self) -> &Governance {
        // ---
        &self.governance
    }

    /// Get the configured write-endpoint token.
    pub(crate) fn api_token(&self) -> &str {
        // ---
        &self.api_token
    }
}
