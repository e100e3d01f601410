//! Mock gateway admin endpoints for end-to-end testing

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use printloom_common::{Error, Result};
use printloom_gateway::mock::MockGateway;
use printloom_gateway::{GenErrorKind, GenerationRequest, RequestKind};
use serde::Deserialize;

use crate::api::middleware::PipelineState;

/// Request to configure mock gateway behavior
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureMockRequest {
    pub delay_ms: Option<u64>,
    /// Failures applied to every call of an operation (design, mockup, listing)
    pub fail_all: Option<HashMap<String, GenErrorKind>>,
    /// Failures keyed by design variation index
    pub design_failures: Option<HashMap<usize, GenErrorKind>>,
    /// Failures keyed by mockup prompt index
    pub mockup_failures: Option<HashMap<usize, GenErrorKind>>,
    pub listing_text: Option<String>,
}

fn mock(state: &PipelineState) -> Result<&MockGateway> {
    state
        .mock_gateway
        .as_ref()
        .ok_or_else(|| Error::NotFound("Mock gateway not enabled".to_string()))
}

fn parse_operation(raw: &str) -> Result<RequestKind> {
    match raw {
        "design" => Ok(RequestKind::Design),
        "mockup" => Ok(RequestKind::Mockup),
        "listing" => Ok(RequestKind::Listing),
        other => Err(Error::Validation(format!(
            "Unknown operation: '{}'. Valid values: design, mockup, listing",
            other
        ))),
    }
}

/// Configure mock gateway behavior
pub async fn configure_mock(
    State(state): State<PipelineState>,
    Json(req): Json<ConfigureMockRequest>,
) -> Result<StatusCode> {
    let behavior = mock(&state)?.behavior();

    // reject the whole request before touching behavior
    let fail_all = req
        .fail_all
        .unwrap_or_default()
        .into_iter()
        .map(|(operation, kind)| parse_operation(&operation).map(|op| (op, kind)))
        .collect::<Result<Vec<_>>>()?;

    for (operation, kind) in fail_all {
        behavior.fail_all(operation, kind);
    }

    if let Some(delay) = req.delay_ms {
        behavior.set_delay_ms(delay);
    }

    for (index, kind) in req.design_failures.unwrap_or_default() {
        behavior.fail_design(index, kind);
    }

    for (index, kind) in req.mockup_failures.unwrap_or_default() {
        behavior.fail_mockup(index, kind);
    }

    if let Some(text) = req.listing_text {
        behavior.set_listing_text(text);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Generation requests received by the mock gateway
pub async fn get_history(
    State(state): State<PipelineState>,
) -> Result<Json<Vec<GenerationRequest>>> {
    Ok(Json(mock(&state)?.recorded_requests()))
}

/// Restore default behavior and clear the history
pub async fn reset_mock(State(state): State<PipelineState>) -> Result<StatusCode> {
    let gateway = mock(&state)?;
    gateway.behavior().reset();
    gateway.reset_history();
    Ok(StatusCode::NO_CONTENT)
}
