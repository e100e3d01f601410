//! Domain layer for favorites

pub mod entities;
