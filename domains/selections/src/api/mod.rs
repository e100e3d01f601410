//! API layer for the Selections domain
//!
//! Only the option catalog is served from here; selection changes go through
//! the pipeline API because they are checked against its candidate collections.

pub mod routes;

pub use routes::routes;
