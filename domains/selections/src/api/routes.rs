//! Route definitions for Selections domain API

use axum::{routing::get, Json, Router};

use crate::domain::catalog::Catalog;

/// Create all Selections domain API routes
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/v1/catalog", get(get_catalog))
}

/// Option catalog for building a selection
async fn get_catalog() -> Json<&'static Catalog> {
    Json(Catalog::standard())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_catalog_route_returns_options() {
        let app: Router = routes();
        let response = app
            .oneshot(Request::get("/v1/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["inspirations"].as_array().unwrap().len() >= 14);
    }
}
