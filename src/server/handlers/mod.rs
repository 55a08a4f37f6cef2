//! HTTP handlers.

mod inspect;
mod metrics;
mod status;

pub use inspect::{fast_inspect_handler, inspect_handler, method_not_allowed, preflight};
pub use metrics::metrics_handler;
pub use status::status_handler;
