//! Domain layer for the pipeline

pub mod entities;
pub mod pipeline;
pub mod state;
