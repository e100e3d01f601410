//! Printloom application composition root
//!
//! Composes all domain routers into a single application.

use axum::Router;
use printloom_common::Config;
use printloom_export::{ArtifactFetcher, ExportPackager, HttpArtifactFetcher};
use printloom_favorites::{FavoritesRepository, FavoritesState, InMemoryFavoritesRepository};
use printloom_gateway::mock::MockGateway;
use printloom_gateway::{GatewayConfig, GatewayFactory, GenerationGateway};
use printloom_pipeline::{PipelineOrchestrator, PipelineState};
use std::sync::Arc;

/// Collaborators injected into the application
#[derive(Clone)]
pub struct AppServices {
    pub gateway: Arc<dyn GenerationGateway>,
    /// Handle to the gateway when the mock provider is active
    pub mock_gateway: Option<MockGateway>,
    pub fetcher: Arc<dyn ArtifactFetcher>,
    pub favorites: Arc<dyn FavoritesRepository>,
    pub mockup_concurrency: usize,
}

impl AppServices {
    /// Build collaborators from configuration
    pub fn from_config(config: &Config, gateway_config: GatewayConfig) -> anyhow::Result<Self> {
        let handle = GatewayFactory::create(gateway_config)?;
        let fetcher = HttpArtifactFetcher::new(config.export_fetch_timeout_secs)?;

        Ok(Self {
            gateway: handle.gateway,
            mock_gateway: handle.mock,
            fetcher: Arc::new(fetcher),
            favorites: Arc::new(InMemoryFavoritesRepository::new()),
            mockup_concurrency: config.mockup_concurrency,
        })
    }

    /// Mock gateway and artifact fetcher with in-memory favorites
    pub fn mock(mockup_concurrency: usize) -> Self {
        let mock = MockGateway::new();
        Self {
            gateway: Arc::new(mock.clone()),
            mock_gateway: Some(mock),
            fetcher: Arc::new(printloom_export::MockArtifactFetcher::new()),
            favorites: Arc::new(InMemoryFavoritesRepository::new()),
            mockup_concurrency,
        }
    }
}

/// Create the main application router from configuration
pub fn create_app(config: &Config, gateway_config: GatewayConfig) -> anyhow::Result<Router> {
    let services = AppServices::from_config(config, gateway_config)?;
    Ok(build_router(services))
}

/// Compose domain routers with shared infrastructure routes
pub fn build_router(services: AppServices) -> Router {
    let provider = services.gateway.provider().to_string();
    let orchestrator = PipelineOrchestrator::new(services.gateway, services.mockup_concurrency);

    tracing::info!(
        %provider,
        mockup_concurrency = orchestrator.mockup_concurrency(),
        "Pipeline orchestrator ready"
    );

    let pipeline_state = PipelineState {
        orchestrator,
        packager: ExportPackager::new(services.fetcher),
        mock_gateway: services.mock_gateway,
    };

    let favorites_state = FavoritesState::new(services.favorites);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Printloom API v0.0.1-SNAPSHOT" }),
        )
        .merge(printloom_selections::routes())
        .merge(printloom_pipeline::routes().with_state(pipeline_state))
        .merge(printloom_favorites::routes().with_state(favorites_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
