//! Favorites API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use printloom_common::{ArtifactUrl, Pagination, Result, ValidatedJson};
use printloom_selections::Stage;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::UserId;
use crate::api::middleware::FavoritesState;
use crate::domain::entities::Favorite;

/// Request to save an artifact as a favorite
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    #[validate(length(min = 1, message = "artifactUrl must not be empty"))]
    pub artifact_url: String,
    pub artifact_kind: Stage,
}

/// List the caller's favorites, newest first
pub async fn list_favorites(
    UserId(user_id): UserId,
    State(state): State<FavoritesState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Favorite>>> {
    let favorites = state.repo.list(&user_id).await?;
    Ok(Json(pagination.apply(favorites)))
}

pub async fn add_favorite(
    UserId(user_id): UserId,
    State(state): State<FavoritesState>,
    ValidatedJson(req): ValidatedJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>)> {
    let favorite = state
        .repo
        .add(&user_id, ArtifactUrl::new(req.artifact_url), req.artifact_kind)
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn remove_favorite(
    UserId(user_id): UserId,
    State(state): State<FavoritesState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repo.remove(&user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
