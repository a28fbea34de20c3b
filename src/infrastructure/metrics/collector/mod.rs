mod request_metrics;

pub use request_metrics::RequestMetrics;
use crate::domain::ClockPtr;
use std::sync::Arc;

/// Creates the in-process metrics collector.
///
/// Counters and latencies are kept in memory only and reported through
/// `GET /metrics`. Nothing is exported in Prometheus format.
pub fn create(clock: ClockPtr) -> anyhow::Result<crate::domain::MetricsPtr> {
    Ok(Arc::new(RequestMetrics::new(clock)))
}
