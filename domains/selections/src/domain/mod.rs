//! Domain layer for selections

pub mod catalog;
pub mod entities;
pub mod store;
