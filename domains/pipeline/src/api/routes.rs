//! Route definitions for Pipeline domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{events, export, mock_admin, pipeline, selections};
use super::middleware::PipelineState;

/// Create all Pipeline domain API routes
pub fn routes() -> Router<PipelineState> {
    Router::new()
        .route("/v1/runs", post(pipeline::start_run))
        .route("/v1/pipeline", get(pipeline::get_pipeline))
        .route("/v1/pipeline/reset", post(pipeline::reset_pipeline))
        .route("/v1/pipeline/mockups", post(pipeline::start_mockups))
        .route("/v1/pipeline/listing", post(pipeline::start_listing))
        .route("/v1/pipeline/events", get(events::pipeline_events))
        .route(
            "/v1/selections/{stage}/toggle",
            post(selections::toggle_selection),
        )
        .route(
            "/v1/selections/{stage}/select-all",
            post(selections::select_all),
        )
        .route(
            "/v1/selections/{stage}/deselect-all",
            post(selections::deselect_all),
        )
        .route("/v1/export", get(export::download_export))
        .route(
            "/internal/mock/gateway/configure",
            post(mock_admin::configure_mock),
        )
        .route("/internal/mock/gateway/history", get(mock_admin::get_history))
        .route("/internal/mock/gateway/reset", post(mock_admin::reset_mock))
}
