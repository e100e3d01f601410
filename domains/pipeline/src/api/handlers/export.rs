//! Export download handler

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use printloom_common::Result;

use crate::api::middleware::PipelineState;

/// Download the zip archive of a completed run
pub async fn download_export(State(state): State<PipelineState>) -> Result<Response> {
    let request = state.orchestrator.export_request()?;

    let archive = state
        .packager
        .build_export(
            &request.selection,
            &request.designs,
            &request.mockups,
            Some(&request.listing),
        )
        .await?;

    tracing::info!(run_id = %request.run_id, bytes = archive.len(), "Serving export");

    let disposition = format!(
        "attachment; filename=\"printloom-run-{}.zip\"",
        request.run_id
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    )
        .into_response())
}
