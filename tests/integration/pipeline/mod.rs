//! Pipeline integration tests: stage flow, guards, failure policy, events

use axum::http::{header, Method, StatusCode};
use futures::StreamExt;
use serde_json::{json, Value};

use printloom_gateway::prompts::PromptTable;
use printloom_selections::ProductCategory;

use crate::common::{christmas_mug, request, urls, TestApp};

async fn history_of(app: &TestApp, kind: &str) -> Vec<Value> {
    let (status, history) = app
        .call(request(Method::GET, "/internal/mock/gateway/history", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    history
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["kind"] == kind)
        .cloned()
        .collect()
}

async fn mockup_history(app: &TestApp) -> Vec<Value> {
    history_of(app, "mockup").await
}

async fn configure(app: &TestApp, body: Value) {
    let (status, _) = app
        .call(request(
            Method::POST,
            "/internal/mock/gateway/configure",
            Some(body),
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

/// Run designs, select the first, and start the mockup stage
async fn start_mockups(app: &TestApp) -> Value {
    let snapshot = app.run_designs(christmas_mug()).await;
    let designs = urls(&snapshot["designs"]);
    app.toggle("design", &designs[0]).await;

    let (status, _) = app
        .call(request(Method::POST, "/v1/pipeline/mockups", None))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    snapshot
}

#[tokio::test]
async fn test_christmas_mug_end_to_end() {
    let app = TestApp::new();

    // Designs: three variations in request order
    let snapshot = app.run_designs(christmas_mug()).await;
    let designs = urls(&snapshot["designs"]);
    assert_eq!(designs.len(), 3);
    let indices: Vec<u64> = snapshot["designs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["requestIndex"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);

    let design_requests = history_of(&app, "design").await;
    assert_eq!(design_requests.len(), 3);
    for sent in &design_requests {
        let prompt = sent["prompt"].as_str().unwrap();
        assert!(prompt.contains("Christmas") && prompt.contains("Mug"));
        assert!(prompt.contains("Festive Red"));
    }

    let toggled = app.toggle("design", &designs[0]).await;
    assert_eq!(toggled["selected"], true);

    // Mockups: ten mug scenes for the one selected design
    let (status, _) = app
        .call(request(Method::POST, "/v1/pipeline/mockups", None))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let snapshot = app.wait_for_stage("awaiting_mockup_selection").await;
    let mockups = urls(&snapshot["mockups"]);
    assert_eq!(mockups.len(), 10);

    let history = mockup_history(&app).await;
    assert_eq!(history.len(), 10);
    let table = PromptTable::for_category(ProductCategory::Mug);
    let mut prompts: Vec<&str> = history
        .iter()
        .map(|r| r["prompt"].as_str().unwrap())
        .collect();
    prompts.sort();
    let mut expected = table.prompts.to_vec();
    expected.sort();
    assert_eq!(prompts, expected);
    assert!(history
        .iter()
        .all(|r| r["sourceArtifact"].as_str() == Some(designs[0].as_str())));

    app.toggle("mockup", &mockups[2]).await;
    let toggled = app.toggle("mockup", &mockups[5]).await;
    assert_eq!(toggled["selectedCount"], 2);

    // Listing
    let (status, _) = app
        .call(request(Method::POST, "/v1/pipeline/listing", None))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let snapshot = app.wait_for_stage("complete").await;
    assert_eq!(snapshot["listing"]["title"], "Christmas Mug");
    assert!(snapshot["failure"].is_null());

    // Export
    let response = app.send(request(Method::GET, "/v1/export", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/zip"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(
        crate::export::entry_names(&bytes),
        vec![
            "designs/design-1.svg",
            "metadata.json",
            "mockups/mockup-1.svg",
            "mockups/mockup-2.svg",
        ]
    );
    let metadata = crate::export::read_metadata(&bytes);
    assert_eq!(metadata["designCount"], 1);
    assert_eq!(metadata["mockupCount"], 2);
    assert_eq!(metadata["selections"]["inspirations"], json!(["Christmas"]));
}

#[tokio::test]
async fn test_mockups_require_selected_design() {
    let app = TestApp::new();
    app.run_designs(christmas_mug()).await;

    let (status, body) = app
        .call(request(Method::POST, "/v1/pipeline/mockups", None))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(app.snapshot().await["stage"], "awaiting_design_selection");
}

#[tokio::test]
async fn test_listing_requires_selected_mockup() {
    let app = TestApp::new();
    start_mockups(&app).await;
    app.wait_for_stage("awaiting_mockup_selection").await;

    let (status, _) = app
        .call(request(Method::POST, "/v1/pipeline/listing", None))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listing_before_mockups_conflicts() {
    let app = TestApp::new();
    app.run_designs(christmas_mug()).await;

    let (status, _) = app
        .call(request(Method::POST, "/v1/pipeline/listing", None))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_all_designs_failing_fails_run() {
    let app = TestApp::new();
    configure(&app, json!({"failAll": {"design": "payment_required"}})).await;

    let (status, _) = app
        .call(request(Method::POST, "/v1/runs", Some(christmas_mug())))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let snapshot = app.wait_for_stage("failed").await;
    assert_eq!(snapshot["failure"]["kind"], "payment_required");
    assert_eq!(snapshot["failure"]["stage"], "designing_batch");
    assert!(snapshot["designs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_design_failure_keeps_successes() {
    let app = TestApp::new();
    configure(&app, json!({"designFailures": {"1": "malformed"}})).await;

    let snapshot = app.run_designs(christmas_mug()).await;
    let indices: Vec<u64> = snapshot["designs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["requestIndex"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test_log::test(tokio::test)]
async fn test_mockup_quota_error_stops_batch() {
    let app = TestApp::with_concurrency(1);
    configure(&app, json!({"mockupFailures": {"3": "rate_limited"}})).await;
    start_mockups(&app).await;

    let snapshot = app.wait_for_stage("failed").await;
    assert_eq!(snapshot["failure"]["kind"], "rate_limited");
    assert_eq!(snapshot["mockups"].as_array().unwrap().len(), 3);
    assert_eq!(mockup_history(&app).await.len(), 4);
}

#[tokio::test]
async fn test_mockup_non_quota_error_is_skipped() {
    let app = TestApp::new();
    configure(&app, json!({"mockupFailures": {"4": "transport"}})).await;
    start_mockups(&app).await;

    let snapshot = app.wait_for_stage("awaiting_mockup_selection").await;
    assert_eq!(snapshot["mockups"].as_array().unwrap().len(), 9);
    assert!(snapshot["failure"].is_null());
}

#[tokio::test]
async fn test_unparseable_listing_completes_with_raw_content() {
    let app = TestApp::new();
    configure(&app, json!({"listingText": "A cozy mug for the holidays."})).await;

    start_mockups(&app).await;
    let snapshot = app.wait_for_stage("awaiting_mockup_selection").await;
    let mockups = urls(&snapshot["mockups"]);
    app.toggle("mockup", &mockups[0]).await;

    let (status, _) = app
        .call(request(Method::POST, "/v1/pipeline/listing", None))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let snapshot = app.wait_for_stage("complete").await;
    assert_eq!(
        snapshot["listing"]["rawContent"],
        "A cozy mug for the holidays."
    );
}

#[tokio::test]
async fn test_reset_discards_run() {
    let app = TestApp::new();
    let snapshot = app.run_designs(christmas_mug()).await;
    let run_id = snapshot["runId"].as_u64().unwrap();

    let (status, snapshot) = app
        .call(request(Method::POST, "/v1/pipeline/reset", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "idle");
    assert!(snapshot["runId"].as_u64().unwrap() > run_id);
    assert!(snapshot["designs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_selecting_unknown_artifact_is_noop() {
    let app = TestApp::new();
    app.run_designs(christmas_mug()).await;

    let body = app.toggle("design", "https://cdn.example.com/not-a-candidate.png").await;
    assert_eq!(body["selected"], false);
    assert_eq!(body["selectedCount"], 0);
}

#[tokio::test]
async fn test_event_stream_starts_with_snapshot() {
    let app = TestApp::new();
    let response = app
        .send(request(Method::GET, "/v1/pipeline/events", None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut stream = response.into_body().into_data_stream();
    let first = stream.next().await.unwrap().unwrap();
    let text = String::from_utf8_lossy(&first);
    assert!(text.contains("event: snapshot"), "first frame: {}", text);
    assert!(text.contains("\"stage\":\"idle\""), "first frame: {}", text);
}

#[tokio::test]
async fn test_catalog_lists_options() {
    let app = TestApp::new();
    let (status, catalog) = app.call(request(Method::GET, "/v1/catalog", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(catalog["inspirations"].as_array().unwrap().len() >= 14);
}
