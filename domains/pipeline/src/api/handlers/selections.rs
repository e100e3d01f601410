//! Candidate selection handlers

use axum::{
    extract::{Path, State},
    Json,
};
use printloom_common::{ArtifactUrl, Error, Result, ValidatedJson};
use printloom_selections::Stage;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::PipelineState;

/// Request to flip the selection of one candidate
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSelectionRequest {
    #[validate(length(min = 1, message = "artifactUrl must not be empty"))]
    pub artifact_url: String,
}

/// Selection state of a stage after a change
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<ArtifactUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    pub selected_count: usize,
}

fn parse_stage(raw: &str) -> Result<Stage> {
    raw.parse::<Stage>().map_err(Error::Validation)
}

fn selection_count(state: &PipelineState, stage: Stage) -> usize {
    state.orchestrator.snapshot().selected_count(stage)
}

/// Toggle one candidate; unknown artifacts leave the selection unchanged
pub async fn toggle_selection(
    State(state): State<PipelineState>,
    Path(stage): Path<String>,
    ValidatedJson(req): ValidatedJson<ToggleSelectionRequest>,
) -> Result<Json<SelectionResponse>> {
    let stage = parse_stage(&stage)?;
    let url = ArtifactUrl::new(req.artifact_url);
    let selected = state.orchestrator.toggle(stage, &url);

    Ok(Json(SelectionResponse {
        stage,
        artifact_url: Some(url),
        selected: Some(selected),
        selected_count: selection_count(&state, stage),
    }))
}

pub async fn select_all(
    State(state): State<PipelineState>,
    Path(stage): Path<String>,
) -> Result<Json<SelectionResponse>> {
    let stage = parse_stage(&stage)?;
    state.orchestrator.select_all(stage);

    Ok(Json(SelectionResponse {
        stage,
        artifact_url: None,
        selected: None,
        selected_count: selection_count(&state, stage),
    }))
}

pub async fn deselect_all(
    State(state): State<PipelineState>,
    Path(stage): Path<String>,
) -> Result<Json<SelectionResponse>> {
    let stage = parse_stage(&stage)?;
    state.orchestrator.deselect_all(stage);

    Ok(Json(SelectionResponse {
        stage,
        artifact_url: None,
        selected: None,
        selected_count: 0,
    }))
}
