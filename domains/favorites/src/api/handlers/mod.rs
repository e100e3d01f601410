//! HTTP handlers for the Favorites domain

pub mod favorites;
