mod cache;
mod clock;
mod error;
mod metrics;
mod product;
mod rate_limit;
mod repository;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr, MetricsReport, MetricsSnapshot};

// Publicly expose the governance abstractions
pub use cache::{CacheLookup, ProductCache, ProductCachePtr};
pub use clock::{Clock, ClockPtr, ManualClock, Sleeper, SleeperPtr, SystemClock, TokioSleeper};
pub use error::GovernanceError;
pub use rate_limit::{RateLimiter, RateLimiterPtr};

// Publicly expose the product model and persistence abstractions
pub use product::{NewProduct, Product, ProductUpdate, SortKey};
pub use repository::{ProductSession, Repository, RepositoryPtr};
