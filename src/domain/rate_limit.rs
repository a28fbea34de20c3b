use super::error::GovernanceError;
use std::sync::Arc;

/// Per-client admission control.
///
/// `check` either records the request against the client's window and
/// returns `Ok(())`, or returns [`GovernanceError::RateLimited`] without
/// recording anything.
pub trait RateLimiter: Send + Sync + 'static {
    // ---
    fn check(&self, client: &str) -> Result<(), GovernanceError>;

    /// Number of distinct client keys currently held.
    fn tracked_clients(&self) -> usize;
}

pub type RateLimiterPtr = Arc<dyn RateLimiter>;
