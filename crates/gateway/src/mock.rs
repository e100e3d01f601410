//! Mock Generation Gateway
//!
//! Programmable mock for exercising the pipeline without a provider:
//! - `MockGateway`: deterministic artifacts with request recording
//! - `MockGatewayBehavior`: per-index failures, whole-operation failures,
//!   latency, and listing text

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use printloom_common::{ArtifactUrl, DataUri};
use printloom_selections::SelectionSet;

use crate::{GenError, GenErrorKind, GenerationGateway, GenerationRequest, Listing, RequestKind};

/// Programmable behavior for the mock gateway
#[derive(Debug, Clone, Default)]
pub struct MockGatewayBehavior {
    pub delay_ms: Arc<RwLock<u64>>,
    /// Extra latency for individual mockup prompt indices
    pub mockup_delays_ms: Arc<RwLock<HashMap<usize, u64>>>,
    /// Failures keyed by design variation index
    pub design_failures: Arc<RwLock<HashMap<usize, GenErrorKind>>>,
    /// Failures keyed by mockup prompt index
    pub mockup_failures: Arc<RwLock<HashMap<usize, GenErrorKind>>>,
    /// Failures applied to every call of an operation
    pub operation_failures: Arc<RwLock<HashMap<RequestKind, GenErrorKind>>>,
    /// Listing model text; `None` produces a JSON listing from the selection
    pub listing_text: Arc<RwLock<Option<String>>>,
}

impl MockGatewayBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure latency applied before every call returns
    pub fn set_delay_ms(&self, delay: u64) {
        *self.delay_ms.write().unwrap() = delay;
    }

    pub fn set_mockup_delay_ms(&self, prompt_index: usize, delay: u64) {
        self.mockup_delays_ms
            .write()
            .unwrap()
            .insert(prompt_index, delay);
    }

    pub fn fail_design(&self, variation_index: usize, kind: GenErrorKind) {
        self.design_failures
            .write()
            .unwrap()
            .insert(variation_index, kind);
    }

    pub fn fail_mockup(&self, prompt_index: usize, kind: GenErrorKind) {
        self.mockup_failures
            .write()
            .unwrap()
            .insert(prompt_index, kind);
    }

    /// Fail every call of `operation` with `kind`
    pub fn fail_all(&self, operation: RequestKind, kind: GenErrorKind) {
        self.operation_failures
            .write()
            .unwrap()
            .insert(operation, kind);
    }

    pub fn set_listing_text(&self, text: impl Into<String>) {
        *self.listing_text.write().unwrap() = Some(text.into());
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        *self.delay_ms.write().unwrap() = 0;
        self.mockup_delays_ms.write().unwrap().clear();
        self.design_failures.write().unwrap().clear();
        self.mockup_failures.write().unwrap().clear();
        self.operation_failures.write().unwrap().clear();
        *self.listing_text.write().unwrap() = None;
    }

    pub fn get_delay_ms(&self) -> u64 {
        *self.delay_ms.read().unwrap()
    }

    fn failure_for(&self, request: &GenerationRequest) -> Option<GenErrorKind> {
        if let Some(kind) = self.operation_failures.read().unwrap().get(&request.kind) {
            return Some(*kind);
        }
        match request.kind {
            RequestKind::Design => request
                .variation_index
                .and_then(|i| self.design_failures.read().unwrap().get(&i).copied()),
            RequestKind::Mockup => request
                .prompt_index
                .and_then(|i| self.mockup_failures.read().unwrap().get(&i).copied()),
            RequestKind::Listing => None,
        }
    }

    fn latency_for(&self, request: &GenerationRequest) -> u64 {
        let extra = match (request.kind, request.prompt_index) {
            (RequestKind::Mockup, Some(i)) => self
                .mockup_delays_ms
                .read()
                .unwrap()
                .get(&i)
                .copied()
                .unwrap_or(0),
            _ => 0,
        };
        self.get_delay_ms() + extra
    }
}

/// Mock generation gateway with programmable behavior
#[derive(Debug, Clone)]
pub struct MockGateway {
    behavior: Arc<MockGatewayBehavior>,
    history: Arc<Mutex<Vec<GenerationRequest>>>,
    sequence: Arc<AtomicU64>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::with_behavior(Arc::new(MockGatewayBehavior::new()))
    }

    pub fn with_behavior(behavior: Arc<MockGatewayBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared behavior for external configuration
    pub fn behavior(&self) -> &Arc<MockGatewayBehavior> {
        &self.behavior
    }

    /// Requests received so far, in arrival order
    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.history.lock().unwrap().clone()
    }

    pub fn recorded_count(&self, kind: RequestKind) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }

    /// Record the request, wait, and apply any configured failure
    async fn serve(&self, request: GenerationRequest) -> Result<u64, GenError> {
        self.history.lock().unwrap().push(request.clone());

        let delay = self.behavior.latency_for(&request);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if let Some(kind) = self.behavior.failure_for(&request) {
            tracing::info!(kind = %request.kind, error = %kind, "Mock gateway: simulated failure");
            return Err(GenError::from_kind(
                kind,
                format!("Simulated {} failure", request.kind),
            ));
        }

        Ok(self.sequence.fetch_add(1, Ordering::SeqCst))
    }

    fn image(label: &str) -> ArtifactUrl {
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"64\" height=\"64\"><text x=\"4\" y=\"32\">{}</text></svg>",
            label
        );
        DataUri::new("image/svg+xml", svg.into_bytes()).to_artifact_url()
    }
}

#[async_trait::async_trait]
impl GenerationGateway for MockGateway {
    async fn generate_design(
        &self,
        selection: &SelectionSet,
        variation_index: usize,
    ) -> Result<ArtifactUrl, GenError> {
        let seq = self
            .serve(GenerationRequest::design(selection, variation_index))
            .await?;
        Ok(Self::image(&format!("mock-design-{}-v{}", seq, variation_index)))
    }

    async fn generate_mockup(
        &self,
        selection: &SelectionSet,
        source_artifact: &ArtifactUrl,
        prompt_index: usize,
    ) -> Result<ArtifactUrl, GenError> {
        let seq = self
            .serve(GenerationRequest::mockup(selection, source_artifact, prompt_index))
            .await?;
        Ok(Self::image(&format!("mock-mockup-{}-p{}", seq, prompt_index)))
    }

    async fn generate_listing(&self, selection: &SelectionSet) -> Result<Listing, GenError> {
        self.serve(GenerationRequest::listing(selection)).await?;

        let configured = self.behavior.listing_text.read().unwrap().clone();
        let text = configured.unwrap_or_else(|| {
            let theme = selection.inspirations().join(" ");
            let product = selection.product_type_names().join(" & ");
            serde_json::json!({
                "title": format!("{} {}", theme, product).trim().to_string(),
                "description": format!("A {} design for {}.", selection.design_style(), product),
                "features": ["Print-ready artwork", "Transparent background"],
                "tags": selection.inspirations(),
                "priceRange": "$15 - $25",
            })
            .to_string()
        });

        Ok(Listing::from_model_text(&text))
    }

    fn provider(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printloom_selections::TagCategory;

    fn selection() -> SelectionSet {
        SelectionSet::new()
            .with(TagCategory::Inspirations, "Christmas")
            .with(TagCategory::ProductTypes, "Mug")
    }

    #[tokio::test]
    async fn test_designs_are_distinct_data_uris() {
        let gateway = MockGateway::new();
        let a = gateway.generate_design(&selection(), 0).await.unwrap();
        let b = gateway.generate_design(&selection(), 0).await.unwrap();

        assert!(a.is_data_uri());
        assert_ne!(a, b);
        assert_eq!(gateway.recorded_count(RequestKind::Design), 2);
    }

    #[tokio::test]
    async fn test_indexed_failure_only_hits_that_index() {
        let gateway = MockGateway::new();
        gateway.behavior().fail_design(1, GenErrorKind::Malformed);

        assert!(gateway.generate_design(&selection(), 0).await.is_ok());
        let err = gateway.generate_design(&selection(), 1).await.unwrap_err();
        assert_eq!(err.kind(), GenErrorKind::Malformed);
        assert!(gateway.generate_design(&selection(), 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_operation_failure_applies_to_every_call() {
        let gateway = MockGateway::new();
        gateway
            .behavior()
            .fail_all(RequestKind::Mockup, GenErrorKind::RateLimited);
        let source = ArtifactUrl::new("https://x.io/d.png");

        for i in 0..3 {
            let err = gateway
                .generate_mockup(&selection(), &source, i)
                .await
                .unwrap_err();
            assert!(err.is_quota());
        }
        assert!(gateway.generate_design(&selection(), 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_mockup_requests_record_source_and_index() {
        let gateway = MockGateway::new();
        let source = ArtifactUrl::new("https://x.io/d.png");
        gateway.generate_mockup(&selection(), &source, 7).await.unwrap();

        let recorded = gateway.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].prompt_index, Some(7));
        assert_eq!(recorded[0].source_artifact.as_ref(), Some(&source));
    }

    #[tokio::test]
    async fn test_default_listing_is_structured() {
        let gateway = MockGateway::new();
        let listing = gateway.generate_listing(&selection()).await.unwrap();
        let details = listing.details().unwrap();
        assert_eq!(details.title, "Christmas Mug");
        assert_eq!(details.tags, vec!["Christmas"]);
    }

    #[tokio::test]
    async fn test_configured_listing_text_can_be_raw() {
        let gateway = MockGateway::new();
        gateway.behavior().set_listing_text("Just a nice mug.");
        let listing = gateway.generate_listing(&selection()).await.unwrap();
        assert_eq!(listing.raw_content(), Some("Just a nice mug."));
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let gateway = MockGateway::new();
        gateway.behavior().set_delay_ms(25);
        gateway
            .behavior()
            .fail_all(RequestKind::Listing, GenErrorKind::Unknown);
        gateway.behavior().reset();

        assert_eq!(gateway.behavior().get_delay_ms(), 0);
        assert!(gateway.generate_listing(&selection()).await.is_ok());
    }
}
