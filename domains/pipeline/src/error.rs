//! Pipeline errors and their HTTP mapping

use thiserror::Error;

use crate::domain::entities::RunId;
use crate::domain::state::StateError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    State(#[from] StateError),

    /// The run a batch belonged to was replaced while it was in flight
    #[error("Run {run_id} was superseded by run {current}")]
    Superseded { run_id: RunId, current: RunId },

    #[error("Pipeline not ready: {0}")]
    NotReady(String),
}

impl From<PipelineError> for printloom_common::Error {
    fn from(err: PipelineError) -> Self {
        printloom_common::Error::Conflict(err.to_string())
    }
}
