//! In-process request metrics collector.
//!
//! Holds the counters and the latency log behind `GET /metrics`. Counters are
//! lock-free atomics; the latency log is an append-only `Vec` guarded by a
//! mutex scoped to that one structure. Nothing is ever reset short of a
//! process restart, and the latency log is unbounded.

use crate::domain::{ClockPtr, Metrics, MetricsSnapshot};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct RequestMetrics {
    request_count: AtomicU64,
    error_count: AtomicU64,
    response_times: Mutex<Vec<Duration>>,
    start_time: Instant,
    clock: ClockPtr,
}

impl RequestMetrics {
    // ---
    /// Creates a collector whose uptime starts at `clock.now()`.
    pub fn new(clock: ClockPtr) -> Self {
        // ---
        Self {
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            response_times: Mutex::new(Vec::new()),
            start_time: clock.now(),
            clock,
        }
    }
}

impl Metrics for RequestMetrics {
    // ---
    fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, elapsed: Duration) {
        self.response_times.lock().push(elapsed);
    }

    fn record_product_created(&self) {}

    fn snapshot(&self) -> MetricsSnapshot {
        // ---
        let (total_latency, samples) = {
            let times = self.response_times.lock();
            (times.iter().sum::<Duration>(), times.len())
        };

        let avg_latency = match u32::try_from(samples) {
            Ok(0) => Duration::ZERO,
            Ok(n) => total_latency / n,
            Err(_) => Duration::from_secs_f64(total_latency.as_secs_f64() / samples as f64),
        };

        let request_count = self.request_count.load(Ordering::Relaxed);
        let uptime = self.clock.now().saturating_duration_since(self.start_time);
        let requests_per_second = if uptime.is_zero() {
            0.0
        } else {
            request_count as f64 / uptime.as_secs_f64()
        };

        MetricsSnapshot {
            request_count,
            error_count: self.error_count.load(Ordering::Relaxed),
            avg_latency,
            total_latency,
            requests_per_second,
        }
    }

    fn render(&self) -> String {
        String::new()
    }
}
