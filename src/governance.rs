//! Request governance service.
//!
//! Bundles the process-wide state every request path shares: the metrics
//! collector, the per-client rate limiter, the product cache and the
//! connection acquirer. One instance is built at startup and injected into
//! the router through `AppState`; clones share the same underlying state.
//!
//! Per request the ordering is fixed:
//! 1. rate-limit admission for the client key; a rejection short-circuits
//!    and is not counted in any metric,
//! 2. the handler runs and is timed whatever its outcome,
//! 3. the request and its latency are recorded, plus an error on failure.

use crate::config::{DatabaseConfig, GovernanceConfig, MetricsExport};
use crate::domain::{
    ClockPtr, GovernanceError, MetricsPtr, ProductCachePtr, RateLimiterPtr, SystemClock,
};
use crate::infrastructure::database::ConnectionAcquirer;
use crate::infrastructure::{cache, metrics, rate_limit};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of [`Governance::handle`].
#[derive(Debug)]
pub enum PipelineError<E> {
    /// Refused before the handler ran.
    Rejected(GovernanceError),
    /// The handler ran and failed; already recorded as an error.
    Handler(E),
}

#[derive(Clone)]
pub struct Governance {
    metrics: MetricsPtr,
    rate_limiter: RateLimiterPtr,
    cache: ProductCachePtr,
    acquirer: ConnectionAcquirer,
}

impl Governance {
    // ---
    pub fn new(
        metrics: MetricsPtr,
        rate_limiter: RateLimiterPtr,
        cache: ProductCachePtr,
        acquirer: ConnectionAcquirer,
    ) -> Self {
        // ---
        Self {
            metrics,
            rate_limiter,
            cache,
            acquirer,
        }
    }

    /// Builds the production governance stack on the system clock.
    ///
    /// # Errors
    /// Fails only if the Prometheus recorder cannot be installed.
    pub fn from_config(governance: &GovernanceConfig, database: &DatabaseConfig) -> Result<Self> {
        // ---
        let clock: ClockPtr = Arc::new(SystemClock);

        let metrics = match governance.metrics_export {
            MetricsExport::Prometheus => metrics::create_prom_metrics(clock.clone())?,
            MetricsExport::Collector => metrics::create_collector_metrics(clock.clone())?,
        };

        Ok(Self::new(
            metrics,
            rate_limit::create(governance.rate_limit, clock),
            cache::create(),
            ConnectionAcquirer::with_policy(database.retry_policy()),
        ))
    }

    pub fn metrics(&self) -> &MetricsPtr {
        &self.metrics
    }

    pub fn rate_limiter(&self) -> &RateLimiterPtr {
        &self.rate_limiter
    }

    pub fn cache(&self) -> &ProductCachePtr {
        &self.cache
    }

    pub fn acquirer(&self) -> &ConnectionAcquirer {
        &self.acquirer
    }

    /// Rate-limit admission check for `client`.
    pub fn admit(&self, client: &str) -> Result<(), GovernanceError> {
        self.rate_limiter.check(client)
    }

    /// Runs `handler`, timing it and recording its outcome.
    ///
    /// Both success and failure count as a completed request with a latency
    /// sample; failure additionally increments the error counter. The
    /// failure is returned unchanged.
    pub async fn observe<F, T, E>(&self, handler: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        // ---
        let start = Instant::now();
        let outcome = handler.await;
        let elapsed = start.elapsed();

        if outcome.is_err() {
            self.metrics.record_error();
        }
        self.metrics.record_request();
        self.metrics.record_latency(elapsed);

        outcome
    }

    /// Full request pipeline: admission, then the observed handler.
    ///
    /// `handler` is not polled at all when `client` is rejected.
    pub async fn handle<F, T, E>(&self, client: &str, handler: F) -> Result<T, PipelineError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        // ---
        self.admit(client).map_err(PipelineError::Rejected)?;
        self.observe(handler).await.map_err(PipelineError::Handler)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::ManualClock;
    use crate::infrastructure::database::RetryPolicy;
    use crate::infrastructure::rate_limit::RateLimitConfig;
    use std::time::Duration;

    fn governance(clock: Arc<ManualClock>) -> Governance {
        // ---
        Governance::new(
            metrics::create_collector_metrics(clock.clone()).unwrap(),
            rate_limit::create(RateLimitConfig::default(), clock),
            cache::create(),
            ConnectionAcquirer::with_policy(RetryPolicy::default()),
        )
    }

    #[tokio::test]
    async fn success_and_failure_are_both_counted() {
        // ---
        let governance = governance(Arc::new(ManualClock::new()));

        let ok: Result<u32, PipelineError<&str>> =
            governance.handle("10.0.0.1", async { Ok(1) }).await;
        assert!(matches!(ok, Ok(1)));

        let failed: Result<u32, PipelineError<&str>> =
            governance.handle("10.0.0.1", async { Err("boom") }).await;
        assert!(matches!(failed, Err(PipelineError::Handler("boom"))));

        let snapshot = governance.metrics().snapshot();
        assert_eq!(snapshot.request_count, 2);
        assert_eq!(snapshot.error_count, 1);
    }

    #[tokio::test]
    async fn rejected_requests_are_not_counted_and_never_run() {
        // ---
        let clock = Arc::new(ManualClock::new());
        let governance = governance(clock.clone());

        for _ in 0..10 {
            let _: Result<(), PipelineError<()>> =
                governance.handle("10.0.0.1", async { Ok(()) }).await;
        }

        let mut ran = false;
        let outcome: Result<(), PipelineError<()>> = governance
            .handle("10.0.0.1", async {
                ran = true;
                Ok(())
            })
            .await;

        assert!(matches!(
            outcome,
            Err(PipelineError::Rejected(GovernanceError::RateLimited { .. }))
        ));
        assert!(!ran);
        assert_eq!(governance.metrics().snapshot().request_count, 10);

        // Admitted again once the window has slid past the first entries
        clock.advance(Duration::from_secs(61));
        let outcome: Result<(), PipelineError<()>> =
            governance.handle("10.0.0.1", async { Ok(()) }).await;
        assert!(outcome.is_ok());
        assert_eq!(governance.metrics().snapshot().request_count, 11);
    }

    #[tokio::test]
    async fn observe_records_latency() {
        // ---
        let governance = governance(Arc::new(ManualClock::new()));

        let _: Result<(), ()> = governance
            .observe(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(())
            })
            .await;

        let snapshot = governance.metrics().snapshot();
        assert!(snapshot.total_latency >= Duration::from_millis(5));
        assert_eq!(snapshot.avg_latency, snapshot.total_latency);
    }

    #[test]
    fn clones_share_state() {
        // ---
        let governance = governance(Arc::new(ManualClock::new()));
        let clone = governance.clone();

        clone.metrics().record_request();
        clone.admit("10.0.0.9").unwrap();

        assert_eq!(governance.metrics().snapshot().request_count, 1);
        assert_eq!(governance.rate_limiter().tracked_clients(), 1);
        assert!(Arc::ptr_eq(governance.cache(), clone.cache()));
        assert_eq!(governance.acquirer().policy(), RetryPolicy::default());
    }
}
