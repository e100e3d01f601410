//! Domain entities for the Favorites domain

use chrono::{DateTime, Utc};
use printloom_common::ArtifactUrl;
use printloom_selections::Stage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A design or mockup saved by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: String,
    pub artifact_url: ArtifactUrl,
    pub artifact_kind: Stage,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: impl Into<String>, artifact_url: ArtifactUrl, artifact_kind: Stage) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            artifact_url,
            artifact_kind,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Favorites domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FavoritesError {
    #[error("Favorite not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid favorite: {0}")]
    Invalid(String),
}

impl From<FavoritesError> for printloom_common::Error {
    fn from(err: FavoritesError) -> Self {
        match err {
            FavoritesError::NotFound(_) => Self::NotFound(err.to_string()),
            FavoritesError::Invalid(_) => Self::Validation(err.to_string()),
        }
    }
}
