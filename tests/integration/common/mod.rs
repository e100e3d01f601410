//! Common test utilities for integration tests
//!
//! - `TestApp`: composed router backed by the mock gateway
//! - request builders and body parsing
//! - stage polling for background batches

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use printloom_app::{build_router, AppServices};
use printloom_gateway::mock::MockGateway;
use serde_json::{json, Value};
use tower::ServiceExt;

/// How long to wait for a background batch to settle
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct TestApp {
    pub router: Router,
    pub gateway: MockGateway,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_concurrency(3)
    }

    pub fn with_concurrency(mockup_concurrency: usize) -> Self {
        let services = AppServices::mock(mockup_concurrency);
        let gateway = services
            .mock_gateway
            .clone()
            .expect("mock services carry a mock gateway");
        Self {
            router: build_router(services),
            gateway,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> axum::http::Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and parse the JSON body (Null when empty)
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn snapshot(&self) -> Value {
        self.call(request(Method::GET, "/v1/pipeline", None)).await.1
    }

    /// Poll the snapshot until the pipeline reaches `stage`
    pub async fn wait_for_stage(&self, stage: &str) -> Value {
        let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
        loop {
            let snapshot = self.snapshot().await;
            if snapshot["stage"] == stage {
                return snapshot;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!(
                    "pipeline did not reach '{}' in time; last snapshot: {}",
                    stage, snapshot
                );
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Start a run and wait for the design batch to settle
    pub async fn run_designs(&self, selection: Value) -> Value {
        let (status, _) = self
            .call(request(Method::POST, "/v1/runs", Some(selection)))
            .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        self.wait_for_stage("awaiting_design_selection").await
    }

    pub async fn toggle(&self, stage: &str, artifact_url: &str) -> Value {
        let (status, body) = self
            .call(request(
                Method::POST,
                &format!("/v1/selections/{}/toggle", stage),
                Some(json!({ "artifactUrl": artifact_url })),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

/// Christmas mug selection used across scenarios
pub fn christmas_mug() -> Value {
    json!({
        "inspirations": ["Christmas"],
        "productTypes": ["Mug"],
        "colorSchemes": ["Festive Red"],
        "designConcepts": ["Minimalist Vector"]
    })
}

pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn user_request(method: Method, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
    let mut request = request(method, uri, body);
    request
        .headers_mut()
        .insert("x-user-id", user.parse().unwrap());
    request
}

pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    }
}

pub fn urls(candidates: &Value) -> Vec<String> {
    candidates
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["artifactUrl"].as_str().unwrap().to_string())
        .collect()
}
