//! Route definitions for Favorites domain API

use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers::favorites;
use super::middleware::FavoritesState;

/// Create all Favorites domain API routes
pub fn routes() -> Router<FavoritesState> {
    Router::new()
        .route(
            "/v1/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/v1/favorites/{id}", delete(favorites::remove_favorite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::repository::InMemoryFavoritesRepository;

    fn app() -> Router {
        routes().with_state(FavoritesState::new(Arc::new(
            InMemoryFavoritesRepository::new(),
        )))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    fn add(user: &str, url: &str, kind: &str) -> Request<Body> {
        Request::post("/v1/favorites")
            .header("x-user-id", user)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"artifactUrl": url, "artifactKind": kind}).to_string(),
            ))
            .unwrap()
    }

    fn list(user: &str) -> Request<Body> {
        Request::get("/v1/favorites")
            .header("x-user-id", user)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list_favorites() {
        let app = app();
        let (status, created) = send(&app, add("alice", "https://cdn/a.png", "design")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["artifactKind"], "design");

        send(&app, add("alice", "https://cdn/b.png", "mockup")).await;

        let (status, listed) = send(&app, list("alice")).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["artifactUrl"], "https://cdn/b.png");
    }

    #[tokio::test]
    async fn test_list_is_paginated() {
        let app = app();
        for name in ["a", "b", "c"] {
            send(&app, add("alice", &format!("https://cdn/{}.png", name), "design")).await;
        }

        let (status, page) = send(
            &app,
            Request::get("/v1/favorites?offset=1&limit=1")
                .header("x-user-id", "alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let page = page.as_array().unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["artifactUrl"], "https://cdn/b.png");
    }

    #[tokio::test]
    async fn test_missing_user_header_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            Request::get("/v1/favorites").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_invalid_kind_rejected() {
        let app = app();
        let (status, _) = send(&app, add("alice", "https://cdn/a.png", "poster")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner() {
        let app = app();
        let (_, created) = send(&app, add("alice", "https://cdn/a.png", "design")).await;
        let id = created["id"].as_str().unwrap().to_string();

        let delete = |user: &str| {
            Request::delete(format!("/v1/favorites/{}", id))
                .header("x-user-id", user)
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = send(&app, delete("bob")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, delete("alice")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, listed) = send(&app, list("alice")).await;
        assert!(listed.as_array().unwrap().is_empty());
    }
}
