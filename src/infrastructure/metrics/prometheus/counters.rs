use metrics::{counter, histogram};
use std::time::Duration;

/// Increment the completed-request counter.
pub fn increment_http_requests() {
    counter!("http_requests_total").increment(1);
}

/// Increment the failed-request counter.
pub fn increment_http_errors() {
    counter!("http_request_errors_total").increment(1);
}

/// Increment a counter for created products.
pub fn increment_product_created() {
    counter!("products_created_total").increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(elapsed: Duration) {
    histogram!("http_request_duration_seconds").record(elapsed);
}
