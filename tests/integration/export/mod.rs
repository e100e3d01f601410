//! Export integration tests: archive layout and readiness

use std::io::{Cursor, Read};

use axum::http::{header, Method, StatusCode};
use serde_json::Value;

use crate::common::{christmas_mug, request, urls, TestApp};

/// Parse `metadata.json` out of an export archive
pub fn read_metadata(bytes: &[u8]) -> Value {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name("metadata.json").unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    serde_json::from_str(&contents).unwrap()
}

pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Drive a run to completion with every candidate selected
async fn complete_run(app: &TestApp) {
    app.run_designs(christmas_mug()).await;
    app.call(request(Method::POST, "/v1/selections/design/select-all", None))
        .await;
    app.call(request(Method::POST, "/v1/pipeline/mockups", None))
        .await;
    let snapshot = app.wait_for_stage("awaiting_mockup_selection").await;
    let mockups = urls(&snapshot["mockups"]);
    app.toggle("mockup", &mockups[0]).await;
    app.call(request(Method::POST, "/v1/pipeline/listing", None))
        .await;
    app.wait_for_stage("complete").await;
}

#[tokio::test]
async fn test_export_before_completion_conflicts() {
    let app = TestApp::new();
    app.run_designs(christmas_mug()).await;

    let (status, body) = app.call(request(Method::GET, "/v1/export", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_export_archive_layout() {
    let app = TestApp::new();
    complete_run(&app).await;

    let response = app.send(request(Method::GET, "/v1/export", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"printloom-run-"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(
        entry_names(&bytes),
        vec![
            "designs/design-1.svg",
            "designs/design-2.svg",
            "designs/design-3.svg",
            "metadata.json",
            "mockups/mockup-1.svg",
        ]
    );

    let metadata = read_metadata(&bytes);
    assert_eq!(metadata["designCount"], 3);
    assert_eq!(metadata["mockupCount"], 1);
    assert_eq!(metadata["listing"]["title"], "Christmas Mug");
    assert!(metadata["exportedAt"].is_string());

    let files = metadata["files"].as_array().unwrap();
    assert_eq!(files.len(), 4);
    assert!(files
        .iter()
        .all(|f| f["sha256"].as_str().unwrap().len() == 64));
}

#[tokio::test]
async fn test_export_after_reset_conflicts() {
    let app = TestApp::new();
    complete_run(&app).await;
    app.call(request(Method::POST, "/v1/pipeline/reset", None))
        .await;

    let (status, _) = app.call(request(Method::GET, "/v1/export", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
