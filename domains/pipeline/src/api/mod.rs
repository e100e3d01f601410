//! API layer for the Pipeline domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::PipelineState;
pub use routes::routes;
