//! In-memory favorites repository

use printloom_common::ArtifactUrl;
use printloom_selections::Stage;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::FavoritesRepository;
use crate::domain::entities::{Favorite, FavoritesError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryFavoritesRepository {
    favorites: Arc<RwLock<Vec<Favorite>>>,
}

impl InMemoryFavoritesRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FavoritesRepository for InMemoryFavoritesRepository {
    async fn add(
        &self,
        user_id: &str,
        artifact_url: ArtifactUrl,
        kind: Stage,
    ) -> Result<Favorite, FavoritesError> {
        if user_id.trim().is_empty() {
            return Err(FavoritesError::Invalid("user id must not be empty".to_string()));
        }

        let mut favorites = self.favorites.write().await;
        if let Some(existing) = favorites
            .iter()
            .find(|f| f.is_owned_by(user_id) && f.artifact_url == artifact_url)
        {
            return Ok(existing.clone());
        }

        let favorite = Favorite::new(user_id, artifact_url, kind);
        favorites.push(favorite.clone());
        tracing::debug!(favorite_id = %favorite.id, user_id, kind = %kind, "Favorite added");
        Ok(favorite)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, FavoritesError> {
        let favorites = self.favorites.read().await;
        // Insertion order is creation order; reverse for newest first
        Ok(favorites
            .iter()
            .rev()
            .filter(|f| f.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn remove(&self, user_id: &str, id: Uuid) -> Result<(), FavoritesError> {
        let mut favorites = self.favorites.write().await;
        let position = favorites
            .iter()
            .position(|f| f.id == id && f.is_owned_by(user_id))
            .ok_or(FavoritesError::NotFound(id))?;
        favorites.remove(position);
        tracing::debug!(favorite_id = %id, user_id, "Favorite removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(name: &str) -> ArtifactUrl {
        ArtifactUrl::new(format!("https://cdn.example.com/{}.png", name))
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryFavoritesRepository::new();
        repo.add("u1", url("a"), Stage::Design).await.unwrap();
        repo.add("u1", url("b"), Stage::Mockup).await.unwrap();
        repo.add("u1", url("c"), Stage::Design).await.unwrap();

        let listed = repo.list("u1").await.unwrap();
        let urls: Vec<&str> = listed.iter().map(|f| f.artifact_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/c.png",
                "https://cdn.example.com/b.png",
                "https://cdn.example.com/a.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_scoped_to_user() {
        let repo = InMemoryFavoritesRepository::new();
        repo.add("u1", url("a"), Stage::Design).await.unwrap();
        repo.add("u2", url("b"), Stage::Design).await.unwrap();

        assert_eq!(repo.list("u1").await.unwrap().len(), 1);
        assert_eq!(repo.list("u3").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_add_same_artifact_is_idempotent() {
        let repo = InMemoryFavoritesRepository::new();
        let first = repo.add("u1", url("a"), Stage::Design).await.unwrap();
        let second = repo.add("u1", url("a"), Stage::Design).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(repo.list("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_user() {
        let repo = InMemoryFavoritesRepository::new();
        let err = repo.add("  ", url("a"), Stage::Design).await.unwrap_err();
        assert!(matches!(err, FavoritesError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_remove_own_favorite() {
        let repo = InMemoryFavoritesRepository::new();
        let favorite = repo.add("u1", url("a"), Stage::Design).await.unwrap();
        repo.remove("u1", favorite.id).await.unwrap();
        assert!(repo.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_other_users_favorite_is_not_found() {
        let repo = InMemoryFavoritesRepository::new();
        let favorite = repo.add("u1", url("a"), Stage::Design).await.unwrap();

        let err = repo.remove("u2", favorite.id).await.unwrap_err();
        assert_eq!(err, FavoritesError::NotFound(favorite.id));
        assert_eq!(repo.list("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let repo = InMemoryFavoritesRepository::new();
        let id = Uuid::new_v4();
        assert_eq!(
            repo.remove("u1", id).await.unwrap_err(),
            FavoritesError::NotFound(id)
        );
    }
}
