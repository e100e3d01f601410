//! Pipeline run handlers
//!
//! Stage-starting endpoints validate and transition synchronously, so guard
//! failures surface as 409, then run the batch in the background and answer
//! 202 with the snapshot. Progress is observed via the snapshot or the event
//! stream.

use axum::{extract::State, http::StatusCode, Json};
use printloom_common::{Result, ValidatedJson};
use printloom_selections::SelectionSet;

use crate::api::middleware::PipelineState;
use crate::domain::entities::PipelineSnapshot;
use crate::error::PipelineError;

fn log_batch_outcome(stage: &'static str, outcome: std::result::Result<PipelineSnapshot, PipelineError>) {
    match outcome {
        Ok(snapshot) => tracing::info!(
            run_id = %snapshot.run_id,
            stage = %snapshot.stage,
            batch = stage,
            "Batch settled"
        ),
        Err(PipelineError::Superseded { run_id, current }) => tracing::info!(
            %run_id,
            %current,
            batch = stage,
            "Batch results discarded"
        ),
        Err(e) => tracing::error!(error = %e, batch = stage, "Batch could not be applied"),
    }
}

/// Start a new run from a selection; designs are generated in the background
pub async fn start_run(
    State(state): State<PipelineState>,
    ValidatedJson(selection): ValidatedJson<SelectionSet>,
) -> Result<(StatusCode, Json<PipelineSnapshot>)> {
    let batch = state.orchestrator.begin_run(selection)?;
    let snapshot = state.orchestrator.snapshot();

    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        log_batch_outcome("designs", orchestrator.run_design_batch(batch).await);
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Current pipeline snapshot
pub async fn get_pipeline(State(state): State<PipelineState>) -> Json<PipelineSnapshot> {
    Json(state.orchestrator.snapshot())
}

/// Discard the current run
pub async fn reset_pipeline(State(state): State<PipelineState>) -> Json<PipelineSnapshot> {
    Json(state.orchestrator.reset())
}

/// Generate mockups for the selected designs
pub async fn start_mockups(
    State(state): State<PipelineState>,
) -> Result<(StatusCode, Json<PipelineSnapshot>)> {
    let batch = state.orchestrator.begin_mockups()?;
    let snapshot = state.orchestrator.snapshot();

    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        log_batch_outcome("mockups", orchestrator.run_mockup_batch(batch).await);
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Generate the listing for the selected mockups
pub async fn start_listing(
    State(state): State<PipelineState>,
) -> Result<(StatusCode, Json<PipelineSnapshot>)> {
    let job = state.orchestrator.begin_listing()?;
    let snapshot = state.orchestrator.snapshot();

    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        log_batch_outcome("listing", orchestrator.run_listing(job).await);
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}
