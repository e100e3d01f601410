//! Favorites domain state

use std::sync::Arc;

use crate::repository::FavoritesRepository;

/// Application state for the Favorites domain
#[derive(Clone)]
pub struct FavoritesState {
    pub repo: Arc<dyn FavoritesRepository>,
}

impl FavoritesState {
    pub fn new(repo: Arc<dyn FavoritesRepository>) -> Self {
        Self { repo }
    }
}
