pub mod collector;
pub mod prometheus;

// Re-export the factory functions for easy access
pub use collector::create as create_collector_metrics;
pub use prometheus::create as create_prom_metrics;
