//! Shared utilities, configuration, and error handling for Printloom
//!
//! This crate provides common functionality used across the Printloom workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - State machine error types shared by domain crates
//! - Opaque artifact references and inline data URI decoding

pub mod artifact;
pub mod config;
pub mod crypto;
pub mod error;
pub mod extractors;
pub mod state;

pub use artifact::{ArtifactUrl, DataUri};
pub use config::Config;
pub use crypto::sha256_hex;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use state::StateError;
