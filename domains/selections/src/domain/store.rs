//! Selection/aggregation store
//!
//! Tracks which generated artifacts the user has chosen at each stage. The
//! store never holds a reference that is missing from the stage's candidate
//! collection: selecting an unknown artifact is a silent no-op.

use printloom_common::ArtifactUrl;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Pipeline stage whose artifacts can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Design,
    Mockup,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Design => write!(f, "design"),
            Self::Mockup => write!(f, "mockup"),
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "design" | "designs" => Ok(Self::Design),
            "mockup" | "mockups" => Ok(Self::Mockup),
            other => Err(format!(
                "Unknown stage: '{}'. Valid values: design, mockup",
                other
            )),
        }
    }
}

/// Read access to a stage's candidate collection
pub trait CandidateSource {
    /// Artifact references in collection order
    fn artifact_urls(&self) -> Vec<&ArtifactUrl>;

    fn contains_artifact(&self, url: &ArtifactUrl) -> bool {
        self.artifact_urls().into_iter().any(|u| u == url)
    }
}

impl CandidateSource for [ArtifactUrl] {
    fn artifact_urls(&self) -> Vec<&ArtifactUrl> {
        self.iter().collect()
    }
}

impl CandidateSource for Vec<ArtifactUrl> {
    fn artifact_urls(&self) -> Vec<&ArtifactUrl> {
        self.iter().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStore {
    designs: HashSet<ArtifactUrl>,
    mockups: HashSet<ArtifactUrl>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, stage: Stage) -> &HashSet<ArtifactUrl> {
        match stage {
            Stage::Design => &self.designs,
            Stage::Mockup => &self.mockups,
        }
    }

    fn set_mut(&mut self, stage: Stage) -> &mut HashSet<ArtifactUrl> {
        match stage {
            Stage::Design => &mut self.designs,
            Stage::Mockup => &mut self.mockups,
        }
    }

    /// Flip the selection of `url`; returns whether it is selected afterwards.
    pub fn toggle<C>(&mut self, stage: Stage, url: &ArtifactUrl, candidates: &C) -> bool
    where
        C: CandidateSource + ?Sized,
    {
        if self.set(stage).contains(url) {
            self.set_mut(stage).remove(url);
            false
        } else {
            self.select(stage, url, candidates)
        }
    }

    /// Select `url`; returns true only when the selection changed
    pub fn select<C>(&mut self, stage: Stage, url: &ArtifactUrl, candidates: &C) -> bool
    where
        C: CandidateSource + ?Sized,
    {
        if !candidates.contains_artifact(url) {
            tracing::debug!(%stage, artifact = %url.preview(), "Ignoring selection of unknown artifact");
            return false;
        }
        self.set_mut(stage).insert(url.clone())
    }

    /// Deselect `url`; returns true only when the selection changed
    pub fn deselect(&mut self, stage: Stage, url: &ArtifactUrl) -> bool {
        self.set_mut(stage).remove(url)
    }

    pub fn select_all<C>(&mut self, stage: Stage, candidates: &C)
    where
        C: CandidateSource + ?Sized,
    {
        let urls: Vec<ArtifactUrl> = candidates.artifact_urls().into_iter().cloned().collect();
        self.set_mut(stage).extend(urls);
    }

    pub fn deselect_all(&mut self, stage: Stage) {
        self.set_mut(stage).clear();
    }

    pub fn is_selected(&self, stage: Stage, url: &ArtifactUrl) -> bool {
        self.set(stage).contains(url)
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.set(stage).len()
    }

    pub fn is_empty(&self, stage: Stage) -> bool {
        self.set(stage).is_empty()
    }

    /// Selected artifacts in candidate-collection order, each reported once
    pub fn selected<C>(&self, stage: Stage, candidates: &C) -> Vec<ArtifactUrl>
    where
        C: CandidateSource + ?Sized,
    {
        let set = self.set(stage);
        let mut seen = HashSet::new();
        candidates
            .artifact_urls()
            .into_iter()
            .filter(|url| set.contains(*url) && seen.insert(*url))
            .cloned()
            .collect()
    }

    pub fn clear_stage(&mut self, stage: Stage) {
        self.set_mut(stage).clear();
    }

    pub fn clear(&mut self) {
        self.designs.clear();
        self.mockups.clear();
    }
}
