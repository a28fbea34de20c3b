//! Sliding-log rate limiter.
//!
//! Keeps the exact timestamp of every admitted request per client key. On
//! each check, timestamps older than the window are pruned and the request is
//! admitted only if fewer than `max_requests` remain. Memory grows with the
//! number of admitted requests inside one window, and client keys are never
//! removed once created, even after their log empties.

use crate::domain::{ClockPtr, GovernanceError, RateLimiter};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rate limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per client inside one window
    pub max_requests: usize,
    /// Width of the trailing window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Per-client sliding-log limiter.
///
/// Each client's log lives in its own `DashMap` shard entry, so the
/// prune/check/append sequence for one client is atomic while different
/// clients proceed independently.
pub struct SlidingLogRateLimiter {
    config: RateLimitConfig,
    clock: ClockPtr,
    windows: DashMap<String, VecDeque<Instant>>,
}

impl SlidingLogRateLimiter {
    // ---
    pub fn new(config: RateLimitConfig, clock: ClockPtr) -> Self {
        // ---
        Self {
            config,
            clock,
            windows: DashMap::new(),
        }
    }

    /// Number of requests currently logged for `client` (without pruning).
    pub fn logged_requests(&self, client: &str) -> usize {
        self.windows.get(client).map(|log| log.len()).unwrap_or(0)
    }
}

impl RateLimiter for SlidingLogRateLimiter {
    // ---
    fn check(&self, client: &str) -> Result<(), GovernanceError> {
        // ---
        let now = self.clock.now();
        let window = self.config.window;

        let mut log = self.windows.entry(client.to_owned()).or_default();

        while let Some(&oldest) = log.front() {
            if now.saturating_duration_since(oldest) > window {
                log.pop_front();
            } else {
                break;
            }
        }

        if log.len() >= self.config.max_requests {
            // The oldest entry is the first to leave the window.
            let retry_after = log
                .front()
                .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
                .unwrap_or(window);

            tracing::warn!(
                client,
                logged = log.len(),
                retry_after_ms = retry_after.as_millis() as u64,
                "rate limit exceeded"
            );
            return Err(GovernanceError::RateLimited {
                client: client.to_owned(),
                retry_after,
            });
        }

        log.push_back(now);
        tracing::debug!(client, logged = log.len(), "request admitted");
        Ok(())
    }

    fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
