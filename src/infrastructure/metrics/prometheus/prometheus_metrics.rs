//! Prometheus metrics implementation.
//!
//! Wraps the in-process [`RequestMetrics`] collector, which still backs
//! `snapshot()`, and mirrors every event into the global `metrics` crate
//! registry so the same numbers can be scraped in Prometheus text format.

use crate::domain::{ClockPtr, Metrics, MetricsSnapshot};
use crate::infrastructure::metrics::collector::RequestMetrics;
use std::time::Duration;

/// Prometheus-backed metrics implementation.
///
/// Counters and histograms are registered globally on first use via the
/// `counter!()` and `histogram!()` macros; the handle stored in `recorder.rs`
/// renders them.
pub struct PrometheusMetrics {
    collector: RequestMetrics,
}

impl PrometheusMetrics {
    pub fn new(clock: ClockPtr) -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {
            collector: RequestMetrics::new(clock),
        }
    }
}

impl Metrics for PrometheusMetrics {
    fn record_request(&self) {
        self.collector.record_request();
        super::increment_http_requests();
    }

    fn record_error(&self) {
        self.collector.record_error();
        super::increment_http_errors();
    }

    fn record_latency(&self, elapsed: Duration) {
        self.collector.record_latency(elapsed);
        super::track_http_request(elapsed);
    }

    fn record_product_created(&self) {
        tracing::debug!("Recording product created event");
        super::increment_product_created();
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.collector.snapshot()
    }

    fn render(&self) -> String {
        super::render_metrics()
    }
}
