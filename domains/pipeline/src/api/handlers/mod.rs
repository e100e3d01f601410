//! HTTP handlers for the Pipeline domain

pub mod events;
pub mod export;
pub mod mock_admin;
pub mod pipeline;
pub mod selections;
