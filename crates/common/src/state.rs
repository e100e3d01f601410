//! Stage transition errors for the pipeline state machine

use thiserror::Error;

/// Why a pipeline stage transition was refused
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    /// The stage has no edge for the event
    #[error("Stage {from} does not accept {event}")]
    InvalidTransition { from: String, event: String },

    /// The edge exists but the current selection does not allow it
    #[error("Selection required: {0}")]
    GuardFailed(String),

    #[error("Stage {0} is final; start a new run or reset")]
    TerminalState(String),
}
