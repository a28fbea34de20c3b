use std::time::Duration;

/// Failure kinds signaled by the request governance layer.
///
/// Callers branch on the variant rather than on message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GovernanceError {
    /// The client already has the maximum number of requests inside the
    /// trailing window. Recoverable by waiting `retry_after`.
    #[error("Too many requests")]
    RateLimited {
        client: String,
        retry_after: Duration,
    },

    /// Every connection attempt allowed by the retry policy failed.
    #[error("database connection unavailable after {attempts} attempts: {reason}")]
    ConnectionUnavailable { attempts: u32, reason: String },
}
