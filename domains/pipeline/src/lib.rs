//! Pipeline domain: design → mockup → listing orchestration
//!
//! - `PipelineStateMachine`: pure stage transitions with selection guards
//! - `Pipeline`: run-tagged state (candidates, selections, listing)
//! - `PipelineOrchestrator`: issues gateway calls and publishes progress

pub mod api;
pub mod domain;
pub mod error;
pub mod orchestrator;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::pipeline::{DesignBatch, ListingJob, MockupBatch, Pipeline};
pub use domain::state::{
    PipelineStage, PipelineStateMachine, SelectionCounts, StageEvent, StateError,
};
pub use error::PipelineError;
pub use orchestrator::PipelineOrchestrator;

// Re-export API types
pub use api::routes;
pub use api::PipelineState;
