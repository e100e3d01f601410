//! Favorites integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{christmas_mug, urls, user_request, TestApp};

#[tokio::test]
async fn test_favorite_generated_design() {
    let app = TestApp::new();
    let snapshot = app.run_designs(christmas_mug()).await;
    let design = urls(&snapshot["designs"])[0].clone();

    let (status, created) = app
        .call(user_request(
            Method::POST,
            "/v1/favorites",
            "alice",
            Some(json!({"artifactUrl": design, "artifactKind": "design"})),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], "alice");

    let (status, listed) = app
        .call(user_request(Method::GET, "/v1/favorites", "alice", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["artifactUrl"], design.as_str());

    // Favorites survive a pipeline reset
    app.call(crate::common::request(Method::POST, "/v1/pipeline/reset", None))
        .await;
    let (_, listed) = app
        .call(user_request(Method::GET, "/v1/favorites", "alice", None))
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_favorites_are_private() {
    let app = TestApp::new();
    let (_, created) = app
        .call(user_request(
            Method::POST,
            "/v1/favorites",
            "alice",
            Some(json!({"artifactUrl": "https://cdn.example.com/a.png", "artifactKind": "mockup"})),
        ))
        .await;
    let id = created["id"].as_str().unwrap();

    let (_, listed) = app
        .call(user_request(Method::GET, "/v1/favorites", "bob", None))
        .await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = app
        .call(user_request(
            Method::DELETE,
            &format!("/v1/favorites/{}", id),
            "bob",
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(user_request(
            Method::DELETE,
            &format!("/v1/favorites/{}", id),
            "alice",
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
