//! Printloom Export Packager
//!
//! Bundles a finished run into one zip archive:
//!
//! ```text
//! metadata.json
//! designs/design-1.png
//! mockups/mockup-1.png
//! mockups/mockup-2.png
//! ```
//!
//! Every artifact is fetched before the archive is written. A single fetch
//! failure aborts the export; no partial archive is ever produced.

pub mod fetcher;

use std::io::{Cursor, Write};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use futures::future::try_join_all;
use printloom_common::{artifact::extension_for_mime, sha256_hex, ArtifactUrl};
use printloom_gateway::Listing;
use printloom_selections::{SelectionSet, Stage};
use serde::Serialize;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub use fetcher::{ArtifactFetcher, FetchedArtifact, HttpArtifactFetcher, MockArtifactFetcher};

pub const METADATA_FILE: &str = "metadata.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to fetch artifact {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export configuration error: {0}")]
    Configuration(String),
}

impl ExportError {
    pub fn fetch_failed(url: &ArtifactUrl, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            url: url.preview(),
            reason: reason.into(),
        }
    }
}

impl From<ExportError> for printloom_common::Error {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::FetchFailed { .. } => printloom_common::Error::Upstream(err.to_string()),
            other => printloom_common::Error::Internal(other.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        Self::Archive(e.to_string())
    }
}

/// One artifact entry in `metadata.json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub path: String,
    pub stage: Stage,
    pub size_bytes: usize,
    pub sha256: String,
}

/// Contents of `metadata.json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata<'a> {
    pub selections: &'a SelectionSet,
    pub listing: Option<&'a Listing>,
    pub design_count: usize,
    pub mockup_count: usize,
    pub exported_at: String,
    pub files: Vec<ExportedFile>,
}

struct PackedFile {
    entry: ExportedFile,
    bytes: Vec<u8>,
}

fn pack(stage: Stage, index: usize, artifact: FetchedArtifact) -> PackedFile {
    let (folder, stem) = match stage {
        Stage::Design => ("designs", "design"),
        Stage::Mockup => ("mockups", "mockup"),
    };
    let path = format!(
        "{}/{}-{}.{}",
        folder,
        stem,
        index + 1,
        extension_for_mime(&artifact.mime_type)
    );
    PackedFile {
        entry: ExportedFile {
            path,
            stage,
            size_bytes: artifact.bytes.len(),
            sha256: sha256_hex(&artifact.bytes),
        },
        bytes: artifact.bytes,
    }
}

/// Builds export archives from selected artifacts
#[derive(Clone)]
pub struct ExportPackager {
    fetcher: Arc<dyn ArtifactFetcher>,
}

impl ExportPackager {
    pub fn new(fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self { fetcher }
    }

    async fn fetch_all(&self, urls: &[ArtifactUrl]) -> Result<Vec<FetchedArtifact>, ExportError> {
        try_join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await
    }

    /// Fetch every selected artifact and write the archive bytes
    pub async fn build_export(
        &self,
        selections: &SelectionSet,
        selected_designs: &[ArtifactUrl],
        selected_mockups: &[ArtifactUrl],
        listing: Option<&Listing>,
    ) -> Result<Vec<u8>, ExportError> {
        let (designs, mockups) = futures::try_join!(
            self.fetch_all(selected_designs),
            self.fetch_all(selected_mockups)
        )
        .inspect_err(|e| tracing::warn!(error = %e, "Export aborted"))?;

        let files: Vec<PackedFile> = designs
            .into_iter()
            .enumerate()
            .map(|(i, a)| pack(Stage::Design, i, a))
            .chain(
                mockups
                    .into_iter()
                    .enumerate()
                    .map(|(i, a)| pack(Stage::Mockup, i, a)),
            )
            .collect();

        let metadata = ExportMetadata {
            selections,
            listing,
            design_count: selected_designs.len(),
            mockup_count: selected_mockups.len(),
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            files: files.iter().map(|f| f.entry.clone()).collect(),
        };

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        // image payloads are already compressed
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file(METADATA_FILE, deflated)?;
        zip.write_all(&serde_json::to_vec_pretty(&metadata)?)?;

        for file in &files {
            zip.start_file(file.entry.path.as_str(), stored)?;
            zip.write_all(&file.bytes)?;
        }

        let archive = zip.finish()?.into_inner();

        tracing::info!(
            design_count = metadata.design_count,
            mockup_count = metadata.mockup_count,
            archive_bytes = archive.len(),
            "Export archive built"
        );

        Ok(archive)
    }
}
