//! API endpoint integration tests
//!
//! Drives the composed application router end to end with the mock
//! generation gateway: pipeline stages, selections, export, favorites.

#![allow(dead_code)]

mod common;
mod export;
mod favorites;
mod pipeline;
