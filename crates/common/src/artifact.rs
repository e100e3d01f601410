//! Opaque artifact references
//!
//! A generated artifact is referenced either by a remote URL or by an inline
//! `data:` URI. The pipeline never looks inside; only the gateway (when it
//! uploads a reference image) and the export packager decode the bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters of a reference shown in logs
const LOG_PREVIEW_LEN: usize = 48;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataUriError {
    #[error("not a data URI")]
    NotDataUri,

    #[error("data URI is missing the ',' separator")]
    MissingSeparator,

    #[error("only base64 data URIs are supported")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Opaque reference to a generated artifact (remote URL or data URI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactUrl(String);

impl ArtifactUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the artifact bytes are carried inline
    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Truncated form for log fields; data URIs can be megabytes long
    pub fn preview(&self) -> String {
        if self.0.chars().count() <= LOG_PREVIEW_LEN {
            self.0.clone()
        } else {
            let head: String = self.0.chars().take(LOG_PREVIEW_LEN).collect();
            format!("{}…", head)
        }
    }
}

impl std::fmt::Display for ArtifactUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArtifactUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ArtifactUrl {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Decoded inline artifact
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Decode a `data:<mime>;base64,<payload>` reference
    pub fn parse(url: &ArtifactUrl) -> Result<Self, DataUriError> {
        let rest = url
            .as_str()
            .strip_prefix("data:")
            .ok_or(DataUriError::NotDataUri)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(DataUriError::MissingSeparator)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;

        let mime_type = if mime_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime_type.to_string()
        };

        Ok(Self { mime_type, bytes })
    }

    /// Wrap already base64-encoded content (as returned by image APIs)
    pub fn from_base64(mime_type: &str, payload: &str) -> ArtifactUrl {
        ArtifactUrl(format!("data:{};base64,{}", mime_type, payload))
    }

    pub fn to_artifact_url(&self) -> ArtifactUrl {
        Self::from_base64(&self.mime_type, &STANDARD.encode(&self.bytes))
    }
}

/// File extension for an image MIME type; unknown types are treated as PNG
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        _ => "png",
    }
}
