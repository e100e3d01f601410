//! Pipeline stage state machine
//!
//! Stages advance strictly in order except for three escape hatches:
//! - `StartRun` and `Reset` are accepted from every stage
//! - `StartMockups` may be re-issued from `AwaitingMockupSelection`
//!
//! Leaving a selection stage is guarded by a non-empty selection for that stage.

use serde::{Deserialize, Serialize};

pub use printloom_common::StateError;

// ============================================================================
// Pipeline State Machine
// ============================================================================

/// Stage of the current pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Idle,
    DesigningBatch,
    AwaitingDesignSelection,
    MockingBatch,
    AwaitingMockupSelection,
    Listing,
    Complete,
    Failed,
}

impl PipelineStage {
    /// Terminal stages only accept `StartRun` and `Reset`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Stages with generation requests outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::DesigningBatch | Self::MockingBatch | Self::Listing)
    }

    /// Stages reachable without starting over
    pub fn valid_transitions(&self) -> &'static [PipelineStage] {
        match self {
            Self::Idle => &[],
            Self::DesigningBatch => &[Self::AwaitingDesignSelection, Self::Failed],
            Self::AwaitingDesignSelection => &[Self::MockingBatch],
            Self::MockingBatch => &[Self::AwaitingMockupSelection, Self::Failed],
            Self::AwaitingMockupSelection => &[Self::MockingBatch, Self::Listing],
            Self::Listing => &[Self::Complete, Self::Failed],
            Self::Complete => &[],
            Self::Failed => &[],
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::DesigningBatch => write!(f, "designing_batch"),
            Self::AwaitingDesignSelection => write!(f, "awaiting_design_selection"),
            Self::MockingBatch => write!(f, "mocking_batch"),
            Self::AwaitingMockupSelection => write!(f, "awaiting_mockup_selection"),
            Self::Listing => write!(f, "listing"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Events that move the pipeline between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// A new run begins with a fresh selection
    StartRun,
    /// The design batch settled with at least one design
    DesignsReady,
    /// The user asked for mockups of the selected designs
    StartMockups,
    /// The mockup batch settled with at least one mockup
    MockupsReady,
    /// The user asked for a listing
    StartListing,
    /// The listing call succeeded
    ListingReady,
    /// The in-flight batch failed
    BatchFailed,
    /// Everything is discarded
    Reset,
}

impl std::fmt::Display for StageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartRun => write!(f, "start_run"),
            Self::DesignsReady => write!(f, "designs_ready"),
            Self::StartMockups => write!(f, "start_mockups"),
            Self::MockupsReady => write!(f, "mockups_ready"),
            Self::StartListing => write!(f, "start_listing"),
            Self::ListingReady => write!(f, "listing_ready"),
            Self::BatchFailed => write!(f, "batch_failed"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// Selection sizes consulted by transition guards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCounts {
    pub designs: usize,
    pub mockups: usize,
}

/// Pipeline state machine
pub struct PipelineStateMachine;

impl PipelineStateMachine {
    /// Attempt a stage transition, ignoring selection guards
    pub fn transition(
        current: PipelineStage,
        event: StageEvent,
    ) -> Result<PipelineStage, StateError> {
        match event {
            StageEvent::StartRun => return Ok(PipelineStage::DesigningBatch),
            StageEvent::Reset => return Ok(PipelineStage::Idle),
            _ => {}
        }

        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (PipelineStage::DesigningBatch, StageEvent::DesignsReady) => {
                PipelineStage::AwaitingDesignSelection
            }
            (
                PipelineStage::AwaitingDesignSelection | PipelineStage::AwaitingMockupSelection,
                StageEvent::StartMockups,
            ) => PipelineStage::MockingBatch,
            (PipelineStage::MockingBatch, StageEvent::MockupsReady) => {
                PipelineStage::AwaitingMockupSelection
            }
            (PipelineStage::AwaitingMockupSelection, StageEvent::StartListing) => {
                PipelineStage::Listing
            }
            (PipelineStage::Listing, StageEvent::ListingReady) => PipelineStage::Complete,
            (
                PipelineStage::DesigningBatch | PipelineStage::MockingBatch | PipelineStage::Listing,
                StageEvent::BatchFailed,
            ) => PipelineStage::Failed,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Attempt a stage transition with selection guards applied
    pub fn transition_guarded(
        current: PipelineStage,
        event: StageEvent,
        counts: SelectionCounts,
    ) -> Result<PipelineStage, StateError> {
        let next = Self::transition(current, event)?;

        match event {
            StageEvent::StartMockups if counts.designs == 0 => Err(StateError::GuardFailed(
                "select at least one design before generating mockups".to_string(),
            )),
            StageEvent::StartListing if counts.mockups == 0 => Err(StateError::GuardFailed(
                "select at least one mockup before generating a listing".to_string(),
            )),
            _ => Ok(next),
        }
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: PipelineStage, event: &StageEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
