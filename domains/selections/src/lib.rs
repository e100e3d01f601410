//! Selections domain: what the user picked before and during a pipeline run
//!
//! - `SelectionSet`: the four attribute tag sets fed into every generation call
//! - `Catalog`: the fixed option lists offered to the user
//! - `SelectionStore`: which generated artifacts are chosen at each stage

pub mod api;
pub mod domain;

pub use domain::catalog::Catalog;
pub use domain::entities::{
    DesignStyle, ProductCategory, ProductTypeTag, SelectionSet, TagCategory,
};
pub use domain::store::{CandidateSource, SelectionStore, Stage};

pub use api::routes;
