// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod metrics;
mod products;
mod root;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, prometheus_handler};
pub use root::{not_found_handler, root_handler};

// Product CRUD handlers
pub use products::{
    create_product, delete_product, get_product, list_products, sorted_products, update_product,
};

// Response and error types shared with the middleware layer
pub use shared_types::{AppError, HandlerFailure};
