use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Abstraction for process-wide request metrics.
///
/// Every request that passes rate limiting is recorded exactly once through
/// `record_request` and `record_latency`; failed requests additionally go
/// through `record_error`. Implementations must tolerate concurrent callers.
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Increment the completed-request counter.
    fn record_request(&self);

    /// Increment the failed-request counter.
    fn record_error(&self);

    /// Append one handler duration to the latency log.
    fn record_latency(&self, elapsed: Duration);

    /// Record a "product created" event.
    fn record_product_created(&self);

    /// Aggregate the current counters and latencies.
    fn snapshot(&self) -> MetricsSnapshot;

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns an empty string when no exporter is installed.
    fn render(&self) -> String;
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;

/// Point-in-time view of the collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    pub error_count: u64,
    /// Mean handler duration, zero when nothing has completed yet.
    pub avg_latency: Duration,
    pub total_latency: Duration,
    /// Completed requests divided by process uptime, zero when no time has elapsed.
    pub requests_per_second: f64,
}

/// Wire form of [`MetricsSnapshot`] returned by `GET /metrics`.
///
/// Durations are reported in seconds rounded to 3 decimal places, throughput
/// to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub request_count: u64,
    pub error_count: u64,
    pub avg_response_time: f64,
    pub total_response_time: f64,
    pub requests_per_second: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    // ---
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl From<MetricsSnapshot> for MetricsReport {
    fn from(snapshot: MetricsSnapshot) -> Self {
        // ---
        Self {
            request_count: snapshot.request_count,
            error_count: snapshot.error_count,
            avg_response_time: round_to(snapshot.avg_latency.as_secs_f64(), 3),
            total_response_time: round_to(snapshot.total_latency.as_secs_f64(), 3),
            requests_per_second: round_to(snapshot.requests_per_second, 2),
        }
    }
}
