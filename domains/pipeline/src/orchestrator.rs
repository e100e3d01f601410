//! Async pipeline orchestrator
//!
//! Sequences gateway calls for each stage and feeds their results into the
//! shared `Pipeline`. The state lock is only taken between awaits, so a new
//! run can start while an old batch is still waiting on the gateway; the old
//! batch's results are then rejected as superseded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use printloom_common::ArtifactUrl;
use printloom_gateway::{GenError, GenerationGateway, DESIGN_VARIATION_COUNT, MOCKUP_PROMPT_COUNT};
use printloom_selections::{SelectionSet, Stage};
use tokio::sync::broadcast;

use crate::domain::entities::{ExportRequest, PipelineEvent, PipelineSnapshot};
use crate::domain::pipeline::{DesignBatch, ListingJob, MockupBatch, Pipeline};
use crate::error::PipelineError;

/// Buffered events per subscriber before it starts lagging
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct PipelineOrchestrator {
    gateway: Arc<dyn GenerationGateway>,
    state: Arc<Mutex<Pipeline>>,
    events: broadcast::Sender<PipelineEvent>,
    mockup_concurrency: usize,
}

impl PipelineOrchestrator {
    pub fn new(gateway: Arc<dyn GenerationGateway>, mockup_concurrency: usize) -> Self {
        Self::with_event_capacity(gateway, mockup_concurrency, EVENT_CHANNEL_CAPACITY)
    }

    /// Like `new`, with `event_capacity` buffered events per subscriber
    pub fn with_event_capacity(
        gateway: Arc<dyn GenerationGateway>,
        mockup_concurrency: usize,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            gateway,
            state: Arc::new(Mutex::new(Pipeline::new())),
            events,
            mockup_concurrency: mockup_concurrency.max(1),
        }
    }

    pub fn mockup_concurrency(&self) -> usize {
        self.mockup_concurrency
    }

    fn lock(&self) -> MutexGuard<'_, Pipeline> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, events: Vec<PipelineEvent>) {
        for event in events {
            tracing::debug!(run_id = %event.run_id(), event = event.name(), "Publishing pipeline event");
            // no subscribers is fine
            let _ = self.events.send(event);
        }
    }

    /// Receive events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        self.lock().snapshot()
    }

    // ------------------------------------------------------------------------
    // Design stage
    // ------------------------------------------------------------------------

    /// Start a new run and generate its designs
    pub async fn start_run(
        &self,
        selection: SelectionSet,
    ) -> Result<PipelineSnapshot, PipelineError> {
        let batch = self.begin_run(selection)?;
        self.run_design_batch(batch).await
    }

    /// Discard the current run and open a new one in `DesigningBatch`
    pub fn begin_run(&self, selection: SelectionSet) -> Result<DesignBatch, PipelineError> {
        let (batch, events) = self.lock().begin_run(selection)?;
        self.publish(events);
        Ok(batch)
    }

    /// Issue the design requests concurrently and settle the stage
    pub async fn run_design_batch(
        &self,
        batch: DesignBatch,
    ) -> Result<PipelineSnapshot, PipelineError> {
        tracing::info!(
            run_id = %batch.run_id,
            provider = self.gateway.provider(),
            "Generating designs"
        );

        let calls = (0..DESIGN_VARIATION_COUNT)
            .map(|variation_index| self.gateway.generate_design(&batch.selection, variation_index));
        let results = join_all(calls).await;

        let events = self.lock().apply_design_results(batch.run_id, results)?;
        self.publish(events);
        Ok(self.snapshot())
    }

    // ------------------------------------------------------------------------
    // Mockup stage
    // ------------------------------------------------------------------------

    /// Generate mockups for every selected design
    pub async fn generate_mockups(&self) -> Result<PipelineSnapshot, PipelineError> {
        let batch = self.begin_mockups()?;
        self.run_mockup_batch(batch).await
    }

    pub fn begin_mockups(&self) -> Result<MockupBatch, PipelineError> {
        let (batch, events) = self.lock().begin_mockups()?;
        self.publish(events);
        Ok(batch)
    }

    /// Issue `MOCKUP_PROMPT_COUNT` requests per design with bounded concurrency.
    /// Results are appended in completion order. A quota error drops every
    /// outstanding request.
    pub async fn run_mockup_batch(
        &self,
        batch: MockupBatch,
    ) -> Result<PipelineSnapshot, PipelineError> {
        let run_id = batch.run_id;
        tracing::info!(
            %run_id,
            designs = batch.designs.len(),
            concurrency = self.mockup_concurrency,
            "Generating mockups"
        );

        let jobs: Vec<(ArtifactUrl, usize)> = batch
            .designs
            .iter()
            .flat_map(|design| (0..MOCKUP_PROMPT_COUNT).map(move |i| (design.clone(), i)))
            .collect();

        let gateway = &self.gateway;
        let selection = &batch.selection;
        let mut results = stream::iter(jobs)
            .map(|(design, prompt_index)| async move {
                let result = gateway
                    .generate_mockup(selection, &design, prompt_index)
                    .await;
                (design, prompt_index, result)
            })
            .buffer_unordered(self.mockup_concurrency);

        let mut quota_error: Option<GenError> = None;
        let mut first_error: Option<GenError> = None;

        while let Some((design, prompt_index, result)) = results.next().await {
            match result {
                Ok(url) => {
                    let events = self
                        .lock()
                        .append_mockup(run_id, &design, prompt_index, url)?;
                    self.publish(events);
                }
                Err(error) if error.is_quota() => {
                    tracing::warn!(%run_id, prompt_index, error = %error, "Quota exhausted, aborting mockup batch");
                    quota_error = Some(error);
                    break;
                }
                Err(error) => {
                    tracing::warn!(%run_id, prompt_index, error = %error, "Mockup request failed");
                    let events = self
                        .lock()
                        .record_mockup_failure(run_id, &design, prompt_index, &error)?;
                    self.publish(events);
                    first_error.get_or_insert(error);
                }
            }
        }
        drop(results);

        let events = self
            .lock()
            .finish_mockups(run_id, quota_error, first_error)?;
        self.publish(events);
        Ok(self.snapshot())
    }

    // ------------------------------------------------------------------------
    // Listing stage
    // ------------------------------------------------------------------------

    pub async fn generate_listing(&self) -> Result<PipelineSnapshot, PipelineError> {
        let job = self.begin_listing()?;
        self.run_listing(job).await
    }

    pub fn begin_listing(&self) -> Result<ListingJob, PipelineError> {
        let (job, events) = self.lock().begin_listing()?;
        self.publish(events);
        Ok(job)
    }

    pub async fn run_listing(&self, job: ListingJob) -> Result<PipelineSnapshot, PipelineError> {
        tracing::info!(run_id = %job.run_id, "Generating listing");

        let result = self.gateway.generate_listing(&job.selection).await;
        let events = self.lock().apply_listing(job.run_id, result)?;
        self.publish(events);
        Ok(self.snapshot())
    }

    // ------------------------------------------------------------------------
    // Selection and lifecycle
    // ------------------------------------------------------------------------

    /// Flip selection of a candidate; returns whether it is selected afterwards
    pub fn toggle(&self, stage: Stage, url: &ArtifactUrl) -> bool {
        self.lock().toggle(stage, url)
    }

    pub fn select_all(&self, stage: Stage) {
        self.lock().select_all(stage);
    }

    pub fn deselect_all(&self, stage: Stage) {
        self.lock().deselect_all(stage);
    }

    pub fn is_selected(&self, stage: Stage, url: &ArtifactUrl) -> bool {
        self.lock().is_selected(stage, url)
    }

    /// Start an empty run in `Idle`; in-flight batches become stale
    pub fn reset(&self) -> PipelineSnapshot {
        let (events, snapshot) = {
            let mut pipeline = self.lock();
            let events = pipeline.reset();
            (events, pipeline.snapshot())
        };
        self.publish(events);
        snapshot
    }

    pub fn export_request(&self) -> Result<ExportRequest, PipelineError> {
        self.lock().export_request()
    }
}
