mod counters;
mod prometheus_metrics;
mod recorder;

pub use prometheus_metrics::PrometheusMetrics;
use crate::domain::ClockPtr;
use std::sync::Arc;

// Re-export utilities for internal use within this module
pub(crate) use counters::{
    increment_http_errors, increment_http_requests, increment_product_created, track_http_request,
};
pub(crate) use recorder::{init_metrics, render_metrics};

/// Creates a new Prometheus metrics implementation.
///
/// Installs the global Prometheus recorder (once per process) and returns a
/// collector that also feeds it, so `GET /metrics/prometheus` can be scraped.
pub fn create(clock: ClockPtr) -> anyhow::Result<crate::domain::MetricsPtr> {
    tracing::info!("Initializing Prometheus metrics");
    init_metrics()?;

    Ok(Arc::new(PrometheusMetrics::new(clock)))
}
