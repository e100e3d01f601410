//! Repository implementations for the Favorites domain

pub mod memory;

use printloom_common::ArtifactUrl;
use printloom_selections::Stage;
use uuid::Uuid;

use crate::domain::entities::{Favorite, FavoritesError};

pub use memory::InMemoryFavoritesRepository;

/// Persistence for favorites, scoped per user
#[async_trait::async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Save an artifact; saving the same artifact twice returns the existing favorite
    async fn add(
        &self,
        user_id: &str,
        artifact_url: ArtifactUrl,
        kind: Stage,
    ) -> Result<Favorite, FavoritesError>;

    /// Favorites of one user, newest first
    async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, FavoritesError>;

    /// Remove a favorite; `NotFound` when absent or owned by another user
    async fn remove(&self, user_id: &str, id: Uuid) -> Result<(), FavoritesError>;
}
