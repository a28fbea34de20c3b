mod sliding_log;

pub use sliding_log::{RateLimitConfig, SlidingLogRateLimiter};
use crate::domain::ClockPtr;
use std::sync::Arc;

/// Creates the per-client sliding-log rate limiter.
pub fn create(config: RateLimitConfig, clock: ClockPtr) -> crate::domain::RateLimiterPtr {
    tracing::info!(
        max_requests = config.max_requests,
        window_secs = config.window.as_secs(),
        "Initializing sliding-log rate limiter"
    );
    Arc::new(SlidingLogRateLimiter::new(config, clock))
}
