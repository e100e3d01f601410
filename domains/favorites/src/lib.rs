//! Favorites domain: designs and mockups a user chose to keep across runs

pub mod api;
pub mod domain;
pub mod repository;

pub use domain::entities::{Favorite, FavoritesError};
pub use repository::{FavoritesRepository, InMemoryFavoritesRepository};

pub use api::routes;
pub use api::FavoritesState;
