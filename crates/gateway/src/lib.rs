//! Printloom Generation Gateway
//!
//! Thin abstraction over the hosted generation services:
//! - `generate_design`: one transparent design image for a selection
//! - `generate_mockup`: one product photo built around a design
//! - `generate_listing`: one marketplace listing for a selection
//!
//! Every call maps to exactly one outbound generation request and is never
//! retried here. Failures are classified into `GenError` so the pipeline can
//! tell quota problems apart from per-item failures.

pub mod listing;
pub mod mock;
pub mod openai;
pub mod prompts;

use std::sync::Arc;

use printloom_common::ArtifactUrl;
use printloom_selections::SelectionSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use listing::{Listing, ListingDetails};
pub use prompts::{GenerationRequest, RequestKind, DESIGN_VARIATION_COUNT, MOCKUP_PROMPT_COUNT};

/// Classified failure of a single generation call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Payment required: {0}")]
    PaymentRequired(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Error classification without the message, as exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenErrorKind {
    RateLimited,
    PaymentRequired,
    Malformed,
    Transport,
    Unknown,
}

impl std::fmt::Display for GenErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::PaymentRequired => write!(f, "payment_required"),
            Self::Malformed => write!(f, "malformed"),
            Self::Transport => write!(f, "transport"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl GenErrorKind {
    /// Quota errors abort the rest of a mockup batch
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::RateLimited | Self::PaymentRequired)
    }
}

impl GenError {
    pub fn kind(&self) -> GenErrorKind {
        match self {
            Self::RateLimited(_) => GenErrorKind::RateLimited,
            Self::PaymentRequired(_) => GenErrorKind::PaymentRequired,
            Self::Malformed(_) => GenErrorKind::Malformed,
            Self::Transport(_) => GenErrorKind::Transport,
            Self::Unknown(_) => GenErrorKind::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::RateLimited(m)
            | Self::PaymentRequired(m)
            | Self::Malformed(m)
            | Self::Transport(m)
            | Self::Unknown(m) => m,
        }
    }

    pub fn is_quota(&self) -> bool {
        self.kind().is_quota()
    }

    /// Build an error of the given classification
    pub fn from_kind(kind: GenErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            GenErrorKind::RateLimited => Self::RateLimited(message),
            GenErrorKind::PaymentRequired => Self::PaymentRequired(message),
            GenErrorKind::Malformed => Self::Malformed(message),
            GenErrorKind::Transport => Self::Transport(message),
            GenErrorKind::Unknown => Self::Unknown(message),
        }
    }

    /// Classify a non-success HTTP status from a generation endpoint
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => Self::RateLimited("Rate limit exceeded. Please try again later.".to_string()),
            402 => Self::PaymentRequired(
                "Payment required. Please add credits to your account.".to_string(),
            ),
            _ => Self::Transport(format!("Generation service returned {}: {}", status, body)),
        }
    }
}

/// Errors raised while constructing a gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway configuration error: {0}")]
    Configuration(String),
}

/// Generation gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Backend provider (openai, mock)
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub image_model: String,
    pub listing_model: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Artificial latency of the mock provider
    pub mock_delay_ms: u64,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("listing_model", &self.listing_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("mock_delay_ms", &self.mock_delay_ms)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            base_url: None,
            image_model: openai::DEFAULT_IMAGE_MODEL.to_string(),
            listing_model: openai::DEFAULT_LISTING_MODEL.to_string(),
            timeout_secs: 120,
            mock_delay_ms: 0,
        }
    }
}

impl GatewayConfig {
    /// Create gateway config from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let parse_u64 = |var: &str, default: u64| -> Result<u64, GatewayError> {
            match std::env::var(var) {
                Ok(raw) => raw.parse().map_err(|_| {
                    GatewayError::Configuration(format!("{} must be an integer, got '{}'", var, raw))
                }),
                Err(_) => Ok(default),
            }
        };

        Ok(Self {
            provider: std::env::var("GATEWAY_PROVIDER").unwrap_or(defaults.provider),
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            image_model: std::env::var("IMAGE_MODEL").unwrap_or(defaults.image_model),
            listing_model: std::env::var("LISTING_MODEL").unwrap_or(defaults.listing_model),
            timeout_secs: parse_u64("GATEWAY_TIMEOUT_SECS", defaults.timeout_secs)?,
            mock_delay_ms: parse_u64("MOCK_GATEWAY_DELAY_MS", defaults.mock_delay_ms)?,
        })
    }
}

/// Generation gateway trait for different AI backends
#[async_trait::async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generate one design image; `variation_index` picks the diversity hint
    async fn generate_design(
        &self,
        selection: &SelectionSet,
        variation_index: usize,
    ) -> Result<ArtifactUrl, GenError>;

    /// Generate one product mockup around `source_artifact`
    async fn generate_mockup(
        &self,
        selection: &SelectionSet,
        source_artifact: &ArtifactUrl,
        prompt_index: usize,
    ) -> Result<ArtifactUrl, GenError>;

    /// Generate the marketplace listing; unparseable text yields `Listing::Raw`
    async fn generate_listing(&self, selection: &SelectionSet) -> Result<Listing, GenError>;

    /// Provider name for diagnostics
    fn provider(&self) -> &str;
}

/// Gateway built by the factory
#[derive(Clone)]
pub struct GatewayHandle {
    pub gateway: Arc<dyn GenerationGateway>,
    /// Control handle, present when the mock provider is active
    pub mock: Option<mock::MockGateway>,
}

/// Factory for creating GenerationGateway implementations
pub struct GatewayFactory;

impl GatewayFactory {
    pub fn create(config: GatewayConfig) -> Result<GatewayHandle, GatewayError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!(
                    image_model = %config.image_model,
                    listing_model = %config.listing_model,
                    "Creating OpenAI generation gateway"
                );
                Ok(GatewayHandle {
                    gateway: Arc::new(openai::OpenAiGateway::new(config)?),
                    mock: None,
                })
            }
            "mock" => {
                tracing::info!(delay_ms = config.mock_delay_ms, "Creating mock generation gateway");
                let gateway = mock::MockGateway::new();
                gateway.behavior().set_delay_ms(config.mock_delay_ms);
                Ok(GatewayHandle {
                    gateway: Arc::new(gateway.clone()),
                    mock: Some(gateway),
                })
            }
            provider => Err(GatewayError::Configuration(format!(
                "Unknown gateway provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}
