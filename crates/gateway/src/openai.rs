//! OpenAI API Implementation
//!
//! - designs: `POST /v1/images/generations`
//! - mockups: `POST /v1/images/edits` (multipart, design uploaded as reference)
//! - listings: `POST /v1/chat/completions`

use std::time::Duration;

use printloom_common::{artifact::extension_for_mime, ArtifactUrl, DataUri};
use printloom_selections::SelectionSet;
use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};

use crate::{
    GatewayConfig, GatewayError, GenError, GenerationGateway, GenerationRequest, Listing,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_LISTING_MODEL: &str = "gpt-4o-mini";

const IMAGE_SIZE: &str = "1024x1024";
const LISTING_SYSTEM_PROMPT: &str =
    "You are an expert e-commerce copywriter for handmade and print-on-demand products. Always respond with valid JSON.";

#[derive(Debug, Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    background: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Generation gateway backed by the OpenAI HTTP API
pub struct OpenAiGateway {
    client: Client,
    config: GatewayConfig,
    api_key: String,
    base_url: String,
}

impl OpenAiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GatewayError::Configuration("OPENAI_API_KEY is required for the openai provider".into())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            config,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// Map transport and HTTP status failures, returning the successful body
    async fn read_success(
        &self,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, GenError> {
        let response =
            result.map_err(|e| GenError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        tracing::warn!(status = status.as_u16(), detail = %detail, "OpenAI request failed");
        Err(GenError::from_status(status.as_u16(), &detail))
    }

    async fn first_image(response: reqwest::Response) -> Result<ArtifactUrl, GenError> {
        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| GenError::Malformed(format!("Failed to parse image response: {}", e)))?;

        let image = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GenError::Malformed("No image in response".to_string()))?;

        match (image.b64_json, image.url) {
            (Some(b64), _) if !b64.is_empty() => Ok(DataUri::from_base64("image/png", &b64)),
            (_, Some(url)) if !url.is_empty() => Ok(ArtifactUrl::new(url)),
            _ => Err(GenError::Malformed("Image entry carries no data".to_string())),
        }
    }

    /// Bytes of the design used as the edit reference
    async fn reference_image(&self, source: &ArtifactUrl) -> Result<DataUri, GenError> {
        if source.is_data_uri() {
            return DataUri::parse(source)
                .map_err(|e| GenError::Unknown(format!("Invalid source artifact: {}", e)));
        }

        // statuses from the artifact host never count as quota
        let response = self
            .client
            .get(source.as_str())
            .send()
            .await
            .map_err(|e| GenError::Transport(format!("Failed to fetch source artifact: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                source = %source.preview(),
                "Source artifact fetch failed"
            );
            return Err(GenError::Transport(format!(
                "Source artifact returned {}",
                status.as_u16()
            )));
        }
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenError::Transport(format!("Failed to read source artifact: {}", e)))?;

        Ok(DataUri::new(mime_type, bytes.to_vec()))
    }
}

#[async_trait::async_trait]
impl GenerationGateway for OpenAiGateway {
    async fn generate_design(
        &self,
        selection: &SelectionSet,
        variation_index: usize,
    ) -> Result<ArtifactUrl, GenError> {
        let request = GenerationRequest::design(selection, variation_index);
        let body = ImageGenerationBody {
            model: &self.config.image_model,
            prompt: &request.prompt,
            n: 1,
            size: IMAGE_SIZE,
            background: "transparent",
        };

        tracing::debug!(variation_index, model = %self.config.image_model, "Requesting design");

        let response = self
            .client
            .post(self.endpoint("images/generations"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;
        let response = self.read_success(response).await?;
        Self::first_image(response).await
    }

    async fn generate_mockup(
        &self,
        selection: &SelectionSet,
        source_artifact: &ArtifactUrl,
        prompt_index: usize,
    ) -> Result<ArtifactUrl, GenError> {
        let request = GenerationRequest::mockup(selection, source_artifact, prompt_index);
        let reference = self.reference_image(source_artifact).await?;
        let file_name = format!("design.{}", extension_for_mime(&reference.mime_type));

        let image = multipart::Part::bytes(reference.bytes)
            .file_name(file_name)
            .mime_str(&reference.mime_type)
            .map_err(|e| GenError::Unknown(format!("Unsupported source type: {}", e)))?;
        let form = multipart::Form::new()
            .text("model", self.config.image_model.clone())
            .text("prompt", request.prompt)
            .text("size", IMAGE_SIZE)
            .text("n", "1")
            .part("image", image);

        tracing::debug!(prompt_index, source = %source_artifact.preview(), "Requesting mockup");

        let response = self
            .client
            .post(self.endpoint("images/edits"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await;
        let response = self.read_success(response).await?;
        Self::first_image(response).await
    }

    async fn generate_listing(&self, selection: &SelectionSet) -> Result<Listing, GenError> {
        let request = GenerationRequest::listing(selection);
        let body = ChatBody {
            model: &self.config.listing_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: LISTING_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
        };

        tracing::debug!(model = %self.config.listing_model, "Requesting listing");

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;
        let response = self.read_success(response).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenError::Malformed(format!("Failed to parse chat response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GenError::Malformed("No listing content in response".to_string()))?;

        Ok(Listing::from_model_text(&content))
    }

    fn provider(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig {
            provider: "openai".to_string(),
            api_key: Some("sk-test".to_string()),
            ..GatewayConfig::default()
        }
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let result = OpenAiGateway::new(GatewayConfig {
            api_key: None,
            ..config()
        });
        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_endpoint_uses_base_url_without_trailing_slash() {
        let gateway = OpenAiGateway::new(GatewayConfig {
            base_url: Some("http://localhost:9999/".to_string()),
            ..config()
        })
        .unwrap();
        assert_eq!(
            gateway.endpoint("images/edits"),
            "http://localhost:9999/v1/images/edits"
        );

        let gateway = OpenAiGateway::new(config()).unwrap();
        assert_eq!(
            gateway.endpoint("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_image_response_parsing() {
        let body: ImageResponse =
            serde_json::from_str(r#"{"created": 1, "data": [{"b64_json": "aGk="}]}"#).unwrap();
        assert_eq!(body.data[0].b64_json.as_deref(), Some("aGk="));

        let empty: ImageResponse = serde_json::from_str(r#"{"created": 1}"#).unwrap();
        assert!(empty.data.is_empty());
    }

    #[test]
    fn test_error_body_parsing() {
        let err: ErrorResponse = serde_json::from_str(
            r#"{"error": {"message": "Billing hard limit reached", "type": "invalid_request_error"}}"#,
        )
        .unwrap();
        assert_eq!(err.error.message, "Billing hard limit reached");
    }

    #[tokio::test]
    async fn test_data_uri_reference_is_decoded_locally() {
        let gateway = OpenAiGateway::new(config()).unwrap();
        let source = DataUri::new("image/png", vec![1, 2, 3]).to_artifact_url();
        let reference = gateway.reference_image(&source).await.unwrap();
        assert_eq!(reference.bytes, vec![1, 2, 3]);
        assert_eq!(reference.mime_type, "image/png");

        let broken = ArtifactUrl::new("data:image/png,plain");
        let err = gateway.reference_image(&broken).await.unwrap_err();
        assert_eq!(err.kind(), crate::GenErrorKind::Unknown);
    }

    /// Serve a single response with the given status line, then close
    async fn serve_once(status_line: &'static str) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        addr
    }

    #[tokio::test]
    async fn test_remote_reference_rate_limit_is_not_quota() {
        let addr = serve_once("429 Too Many Requests").await;
        let gateway = OpenAiGateway::new(config()).unwrap();
        let source = ArtifactUrl::new(format!("http://{}/designs/d0.png", addr));

        let err = gateway.reference_image(&source).await.unwrap_err();
        assert!(!err.is_quota());
        assert_eq!(err.kind(), crate::GenErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_remote_reference_payment_required_is_not_quota() {
        let addr = serve_once("402 Payment Required").await;
        let gateway = OpenAiGateway::new(config()).unwrap();
        let source = ArtifactUrl::new(format!("http://{}/designs/d1.png", addr));

        let err = gateway.reference_image(&source).await.unwrap_err();
        assert!(!err.is_quota());
        assert_eq!(err.kind(), crate::GenErrorKind::Transport);
    }
}
