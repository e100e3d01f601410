//! Run-tagged pipeline state
//!
//! `Pipeline` owns the stage, the candidate collections, the selection store
//! and the listing of the current run. It never awaits: the orchestrator
//! calls it between gateway calls, passing back the run id each batch was
//! issued under. Results tagged with any other run id are rejected with
//! `PipelineError::Superseded` and leave the state untouched.
//!
//! Every mutating method returns the events to publish.

use printloom_common::ArtifactUrl;
use printloom_gateway::{GenError, Listing};
use printloom_selections::{SelectionSet, SelectionStore, Stage};

use super::entities::{
    Candidate, CandidateView, Candidates, ExportRequest, FailureInfo, PipelineEvent,
    PipelineSnapshot, RunId,
};
use super::state::{PipelineStage, PipelineStateMachine, SelectionCounts, StageEvent};
use crate::error::PipelineError;

/// Design batch issued for a run
#[derive(Debug, Clone)]
pub struct DesignBatch {
    pub run_id: RunId,
    pub selection: SelectionSet,
}

/// Mockup batch: selected designs captured when the stage started
#[derive(Debug, Clone)]
pub struct MockupBatch {
    pub run_id: RunId,
    pub selection: SelectionSet,
    pub designs: Vec<ArtifactUrl>,
}

/// Single listing call issued for a run
#[derive(Debug, Clone)]
pub struct ListingJob {
    pub run_id: RunId,
    pub selection: SelectionSet,
}

#[derive(Debug, Default)]
pub struct Pipeline {
    run_id: RunId,
    stage: PipelineStage,
    selection: SelectionSet,
    designs: Candidates,
    mockups: Candidates,
    store: SelectionStore,
    listing: Option<Listing>,
    failure: Option<FailureInfo>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn candidates(&self, stage: Stage) -> &Candidates {
        match stage {
            Stage::Design => &self.designs,
            Stage::Mockup => &self.mockups,
        }
    }

    fn ensure_current(&self, run_id: RunId) -> Result<(), PipelineError> {
        if run_id == self.run_id {
            Ok(())
        } else {
            Err(PipelineError::Superseded {
                run_id,
                current: self.run_id,
            })
        }
    }

    fn counts(&self) -> SelectionCounts {
        SelectionCounts {
            designs: self.store.count(Stage::Design),
            mockups: self.store.count(Stage::Mockup),
        }
    }

    /// Apply a stage event and describe the change
    fn advance(&mut self, event: StageEvent) -> Result<PipelineEvent, PipelineError> {
        let from = self.stage;
        let to = PipelineStateMachine::transition_guarded(from, event, self.counts())?;
        self.stage = to;

        tracing::info!(run_id = %self.run_id, %from, %to, %event, "Pipeline stage changed");

        Ok(PipelineEvent::StageChanged {
            run_id: self.run_id,
            from,
            to,
        })
    }

    /// Drop everything tied to the previous run and mint a new run id
    fn start_over(&mut self, selection: SelectionSet) {
        self.run_id = self.run_id.next();
        self.selection = selection;
        self.designs.clear();
        self.mockups.clear();
        self.store.clear();
        self.listing = None;
        self.failure = None;
    }

    fn fail(&mut self, error: &GenError) -> Result<Vec<PipelineEvent>, PipelineError> {
        let failure = FailureInfo::new(error, self.stage);
        let changed = self.advance(StageEvent::BatchFailed)?;
        self.failure = Some(failure.clone());

        tracing::warn!(
            run_id = %self.run_id,
            stage = %failure.stage,
            kind = %failure.kind,
            message = %failure.message,
            "Pipeline run failed"
        );

        Ok(vec![
            changed,
            PipelineEvent::RunFailed {
                run_id: self.run_id,
                failure,
            },
        ])
    }

    // ------------------------------------------------------------------------
    // Design stage
    // ------------------------------------------------------------------------

    pub fn begin_run(
        &mut self,
        selection: SelectionSet,
    ) -> Result<(DesignBatch, Vec<PipelineEvent>), PipelineError> {
        self.start_over(selection.clone());
        let changed = self.advance(StageEvent::StartRun)?;

        let batch = DesignBatch {
            run_id: self.run_id,
            selection: selection.clone(),
        };
        let events = vec![
            PipelineEvent::RunStarted {
                run_id: self.run_id,
                selection,
            },
            changed,
        ];
        Ok((batch, events))
    }

    /// Settle the design batch; `results` are in variation-index order
    pub fn apply_design_results(
        &mut self,
        run_id: RunId,
        results: Vec<Result<ArtifactUrl, GenError>>,
    ) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.ensure_current(run_id)?;

        let mut events = Vec::new();
        let mut first_error: Option<GenError> = None;

        for (request_index, result) in results.into_iter().enumerate() {
            match result {
                Ok(artifact_url) if self.designs.contains(&artifact_url) => {
                    tracing::debug!(
                        %run_id,
                        variation_index = request_index,
                        artifact = %artifact_url.preview(),
                        "Skipping repeated design artifact"
                    );
                }
                Ok(artifact_url) => {
                    let candidate = Candidate {
                        artifact_url,
                        request_index,
                        source_artifact: None,
                    };
                    self.designs.push(candidate.clone());
                    events.push(PipelineEvent::CandidateAppended {
                        run_id,
                        stage: Stage::Design,
                        position: self.designs.len() - 1,
                        candidate,
                    });
                }
                Err(error) => {
                    tracing::warn!(%run_id, variation_index = request_index, error = %error, "Design request failed");
                    events.push(PipelineEvent::CandidateFailed {
                        run_id,
                        stage: Stage::Design,
                        request_index,
                        source_artifact: None,
                        kind: error.kind(),
                        message: error.message().to_string(),
                    });
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) if self.designs.is_empty() => events.extend(self.fail(&error)?),
            _ => events.push(self.advance(StageEvent::DesignsReady)?),
        }
        Ok(events)
    }

    // ------------------------------------------------------------------------
    // Mockup stage
    // ------------------------------------------------------------------------

    pub fn begin_mockups(&mut self) -> Result<(MockupBatch, Vec<PipelineEvent>), PipelineError> {
        let changed = self.advance(StageEvent::StartMockups)?;
        self.mockups.clear();
        self.store.clear_stage(Stage::Mockup);

        let batch = MockupBatch {
            run_id: self.run_id,
            selection: self.selection.clone(),
            designs: self.store.selected(Stage::Design, &self.designs),
        };
        Ok((batch, vec![changed]))
    }

    pub fn append_mockup(
        &mut self,
        run_id: RunId,
        source_artifact: &ArtifactUrl,
        prompt_index: usize,
        artifact_url: ArtifactUrl,
    ) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.ensure_current(run_id)?;

        if self.mockups.contains(&artifact_url) {
            tracing::debug!(
                %run_id,
                prompt_index,
                artifact = %artifact_url.preview(),
                "Skipping repeated mockup artifact"
            );
            return Ok(Vec::new());
        }

        let candidate = Candidate {
            artifact_url,
            request_index: prompt_index,
            source_artifact: Some(source_artifact.clone()),
        };
        self.mockups.push(candidate.clone());

        Ok(vec![PipelineEvent::CandidateAppended {
            run_id,
            stage: Stage::Mockup,
            position: self.mockups.len() - 1,
            candidate,
        }])
    }

    pub fn record_mockup_failure(
        &mut self,
        run_id: RunId,
        source_artifact: &ArtifactUrl,
        prompt_index: usize,
        error: &GenError,
    ) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.ensure_current(run_id)?;

        Ok(vec![PipelineEvent::CandidateFailed {
            run_id,
            stage: Stage::Mockup,
            request_index: prompt_index,
            source_artifact: Some(source_artifact.clone()),
            kind: error.kind(),
            message: error.message().to_string(),
        }])
    }

    /// Settle the mockup batch. A quota error fails the run even when
    /// mockups were collected; those stay visible in the snapshot.
    pub fn finish_mockups(
        &mut self,
        run_id: RunId,
        quota_error: Option<GenError>,
        first_error: Option<GenError>,
    ) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.ensure_current(run_id)?;

        if let Some(error) = quota_error {
            return self.fail(&error);
        }
        if self.mockups.is_empty() {
            let error = first_error
                .unwrap_or_else(|| GenError::Unknown("No mockups were generated".to_string()));
            return self.fail(&error);
        }
        Ok(vec![self.advance(StageEvent::MockupsReady)?])
    }

    // ------------------------------------------------------------------------
    // Listing stage
    // ------------------------------------------------------------------------

    pub fn begin_listing(&mut self) -> Result<(ListingJob, Vec<PipelineEvent>), PipelineError> {
        let changed = self.advance(StageEvent::StartListing)?;
        let job = ListingJob {
            run_id: self.run_id,
            selection: self.selection.clone(),
        };
        Ok((job, vec![changed]))
    }

    pub fn apply_listing(
        &mut self,
        run_id: RunId,
        result: Result<Listing, GenError>,
    ) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.ensure_current(run_id)?;

        match result {
            Ok(listing) => {
                let changed = self.advance(StageEvent::ListingReady)?;
                self.listing = Some(listing.clone());
                Ok(vec![PipelineEvent::ListingReady { run_id, listing }, changed])
            }
            Err(error) => self.fail(&error),
        }
    }

    // ------------------------------------------------------------------------
    // Reset, selection, observation
    // ------------------------------------------------------------------------

    pub fn reset(&mut self) -> Vec<PipelineEvent> {
        let from = self.stage;
        self.start_over(SelectionSet::new());
        self.stage = PipelineStage::Idle;

        tracing::info!(run_id = %self.run_id, %from, "Pipeline reset");

        vec![PipelineEvent::StageChanged {
            run_id: self.run_id,
            from,
            to: PipelineStage::Idle,
        }]
    }

    /// Flip selection of a candidate; unknown references are ignored
    pub fn toggle(&mut self, stage: Stage, url: &ArtifactUrl) -> bool {
        let candidates = match stage {
            Stage::Design => &self.designs,
            Stage::Mockup => &self.mockups,
        };
        self.store.toggle(stage, url, candidates)
    }

    pub fn select_all(&mut self, stage: Stage) {
        let candidates = match stage {
            Stage::Design => &self.designs,
            Stage::Mockup => &self.mockups,
        };
        self.store.select_all(stage, candidates);
    }

    pub fn deselect_all(&mut self, stage: Stage) {
        self.store.deselect_all(stage);
    }

    pub fn is_selected(&self, stage: Stage, url: &ArtifactUrl) -> bool {
        self.store.is_selected(stage, url)
    }

    pub fn selected(&self, stage: Stage) -> Vec<ArtifactUrl> {
        self.store.selected(stage, self.candidates(stage))
    }

    fn views(&self, stage: Stage) -> Vec<CandidateView> {
        self.candidates(stage)
            .iter()
            .map(|candidate| CandidateView {
                selected: self.store.is_selected(stage, &candidate.artifact_url),
                candidate: candidate.clone(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            run_id: self.run_id,
            stage: self.stage,
            selection: self.selection.clone(),
            designs: self.views(Stage::Design),
            mockups: self.views(Stage::Mockup),
            listing: self.listing.clone(),
            failure: self.failure.clone(),
        }
    }

    /// Export hand-off; only a completed run can be exported
    pub fn export_request(&self) -> Result<ExportRequest, PipelineError> {
        let listing = match (&self.stage, &self.listing) {
            (PipelineStage::Complete, Some(listing)) => listing.clone(),
            _ => {
                return Err(PipelineError::NotReady(format!(
                    "export requires a complete run, current stage is {}",
                    self.stage
                )))
            }
        };

        Ok(ExportRequest {
            run_id: self.run_id,
            selection: self.selection.clone(),
            designs: self.selected(Stage::Design),
            mockups: self.selected(Stage::Mockup),
            listing,
        })
    }
}
