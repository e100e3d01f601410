//! Artifact byte retrieval for the export packager

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use printloom_common::{ArtifactUrl, DataUri};
use reqwest::Client;

use crate::ExportError;

/// Artifact bytes with their content type
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedArtifact {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl From<DataUri> for FetchedArtifact {
    fn from(data: DataUri) -> Self {
        Self {
            mime_type: data.mime_type,
            bytes: data.bytes,
        }
    }
}

/// Source of artifact bytes
#[async_trait::async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &ArtifactUrl) -> Result<FetchedArtifact, ExportError>;
}

/// Decodes data URIs inline and downloads remote URLs
pub struct HttpArtifactFetcher {
    client: Client,
}

impl HttpArtifactFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExportError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn fetch(&self, url: &ArtifactUrl) -> Result<FetchedArtifact, ExportError> {
        if url.is_data_uri() {
            return DataUri::parse(url)
                .map(FetchedArtifact::from)
                .map_err(|e| ExportError::fetch_failed(url, e.to_string()));
        }

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ExportError::fetch_failed(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::fetch_failed(url, format!("HTTP {}", status)));
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
            .map_err(|e| ExportError::fetch_failed(url, e.to_string()))?;

        Ok(FetchedArtifact {
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// In-memory fetcher with programmable failures and a fetch log
#[derive(Debug, Clone, Default)]
pub struct MockArtifactFetcher {
    artifacts: Arc<RwLock<HashMap<ArtifactUrl, FetchedArtifact>>>,
    failures: Arc<RwLock<HashMap<ArtifactUrl, String>>>,
    fetched: Arc<Mutex<Vec<ArtifactUrl>>>,
}

impl MockArtifactFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: ArtifactUrl, mime_type: &str, bytes: Vec<u8>) {
        self.artifacts.write().unwrap().insert(
            url,
            FetchedArtifact {
                mime_type: mime_type.to_string(),
                bytes,
            },
        );
    }

    pub fn fail(&self, url: ArtifactUrl, reason: &str) {
        self.failures
            .write()
            .unwrap()
            .insert(url, reason.to_string());
    }

    /// URLs requested so far
    pub fn fetched(&self) -> Vec<ArtifactUrl> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArtifactFetcher for MockArtifactFetcher {
    async fn fetch(&self, url: &ArtifactUrl) -> Result<FetchedArtifact, ExportError> {
        self.fetched.lock().unwrap().push(url.clone());

        if let Some(reason) = self.failures.read().unwrap().get(url) {
            return Err(ExportError::fetch_failed(url, reason.clone()));
        }
        if let Some(artifact) = self.artifacts.read().unwrap().get(url) {
            return Ok(artifact.clone());
        }
        if url.is_data_uri() {
            return DataUri::parse(url)
                .map(FetchedArtifact::from)
                .map_err(|e| ExportError::fetch_failed(url, e.to_string()));
        }
        Err(ExportError::fetch_failed(url, "not found"))
    }
}
