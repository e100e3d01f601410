//! API layer for the Favorites domain

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use extractors::UserId;
pub use middleware::FavoritesState;
pub use routes::routes;
