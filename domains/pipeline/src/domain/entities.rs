//! Domain entities for the Pipeline domain

use printloom_common::ArtifactUrl;
use printloom_gateway::{GenError, GenErrorKind, Listing};
use printloom_selections::{CandidateSource, SelectionSet, Stage};
use serde::{Deserialize, Serialize};

use super::state::PipelineStage;

/// Identifier of one pipeline run; every batch result is tagged with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl RunId {
    pub fn next(self) -> RunId {
        RunId(self.0 + 1)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A successful generation result in a stage's candidate collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub artifact_url: ArtifactUrl,
    /// Variation index (designs) or prompt index (mockups)
    pub request_index: usize,
    /// Design the mockup was generated from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_artifact: Option<ArtifactUrl>,
}

/// Ordered candidate collection; entries are only ever appended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates(Vec<Candidate>);

impl Candidates {
    pub fn push(&mut self, candidate: Candidate) {
        self.0.push(candidate);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.0
    }

    pub fn contains(&self, url: &ArtifactUrl) -> bool {
        self.0.iter().any(|c| &c.artifact_url == url)
    }
}

impl CandidateSource for Candidates {
    fn artifact_urls(&self) -> Vec<&ArtifactUrl> {
        self.0.iter().map(|c| &c.artifact_url).collect()
    }
}

/// Candidate as exposed to clients, with its selection flag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub selected: bool,
}

/// Why a run ended in `Failed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureInfo {
    pub kind: GenErrorKind,
    pub message: String,
    /// Stage that was in flight when the run failed
    pub stage: PipelineStage,
}

impl FailureInfo {
    pub fn new(error: &GenError, stage: PipelineStage) -> Self {
        Self {
            kind: error.kind(),
            message: error.message().to_string(),
            stage,
        }
    }
}

/// Serializable view of the whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub run_id: RunId,
    pub stage: PipelineStage,
    pub selection: SelectionSet,
    pub designs: Vec<CandidateView>,
    pub mockups: Vec<CandidateView>,
    pub listing: Option<Listing>,
    pub failure: Option<FailureInfo>,
}

impl PipelineSnapshot {
    pub fn candidates(&self, stage: Stage) -> &[CandidateView] {
        match stage {
            Stage::Design => &self.designs,
            Stage::Mockup => &self.mockups,
        }
    }

    pub fn selected_count(&self, stage: Stage) -> usize {
        self.candidates(stage).iter().filter(|c| c.selected).count()
    }
}

/// Progress notifications published while a run advances
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    #[serde(rename_all = "camelCase")]
    RunStarted {
        run_id: RunId,
        selection: SelectionSet,
    },
    #[serde(rename_all = "camelCase")]
    StageChanged {
        run_id: RunId,
        from: PipelineStage,
        to: PipelineStage,
    },
    #[serde(rename_all = "camelCase")]
    CandidateAppended {
        run_id: RunId,
        stage: Stage,
        /// Position of the candidate in its collection
        position: usize,
        candidate: Candidate,
    },
    #[serde(rename_all = "camelCase")]
    CandidateFailed {
        run_id: RunId,
        stage: Stage,
        request_index: usize,
        source_artifact: Option<ArtifactUrl>,
        kind: GenErrorKind,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    ListingReady { run_id: RunId, listing: Listing },
    #[serde(rename_all = "camelCase")]
    RunFailed { run_id: RunId, failure: FailureInfo },
}

impl PipelineEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::StageChanged { run_id, .. }
            | Self::CandidateAppended { run_id, .. }
            | Self::CandidateFailed { run_id, .. }
            | Self::ListingReady { run_id, .. }
            | Self::RunFailed { run_id, .. } => *run_id,
        }
    }

    /// Event name used on the SSE stream
    pub fn name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::StageChanged { .. } => "stage_changed",
            Self::CandidateAppended { .. } => "candidate_appended",
            Self::CandidateFailed { .. } => "candidate_failed",
            Self::ListingReady { .. } => "listing_ready",
            Self::RunFailed { .. } => "run_failed",
        }
    }
}

/// Everything the export packager needs from a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub run_id: RunId,
    pub selection: SelectionSet,
    pub designs: Vec<ArtifactUrl>,
    pub mockups: Vec<ArtifactUrl>,
    pub listing: Listing,
}
