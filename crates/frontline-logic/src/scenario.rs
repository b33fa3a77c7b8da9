//! Theatre configuration: seeds, allegiance, borders and starting forces.
//!
//! A scenario is plain JSON. Loading parses it and runs [`Scenario::validate`];
//! any issue rejects the whole file so a half-valid theatre never reaches
//! the partitioner.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::{GroupId, MobileGroup};
use crate::partition::MapSettings;
use crate::seeds::Seed;
use crate::RegionId;

/// A named formation that groups belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub id: String,
    pub name: String,
    pub commander: String,
    pub faction: String,
}

/// Everything needed to start a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub settings: MapSettings,
    pub seeds: Vec<Seed>,
    #[serde(default)]
    pub formations: Vec<Formation>,
    #[serde(default)]
    pub forces: Vec<MobileGroup>,
}

/// A problem found while validating a scenario.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioIssue {
    #[error("scenario has no seeds")]
    NoSeeds,
    #[error("canvas is not a usable area")]
    InvalidCanvas,
    #[error("seed id {0} is used more than once")]
    DuplicateSeedId(RegionId),
    #[error("seed {0} lies outside the padded canvas")]
    SeedOutsideCanvas(RegionId),
    #[error("group id {0} is used more than once")]
    DuplicateGroupId(GroupId),
    #[error("group {0} starts in unknown region {1}")]
    UnknownStartRegion(GroupId, RegionId),
    #[error("group {0} has an order to unknown region {1}")]
    UnknownTargetRegion(GroupId, RegionId),
    #[error("group {0} belongs to unknown formation {1}")]
    UnknownFormation(GroupId, String),
}

/// Why a scenario could not be loaded.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario has {} issue(s), first: {}", .0.len(), first_issue(.0))]
    Invalid(Vec<ScenarioIssue>),
}

fn first_issue(issues: &[ScenarioIssue]) -> String {
    issues.first().map(|i| i.to_string()).unwrap_or_default()
}

impl Scenario {
    /// Parse and validate a scenario.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        let issues = scenario.validate();
        if !issues.is_empty() {
            return Err(ScenarioError::Invalid(issues));
        }
        log::info!(
            "Loaded scenario '{}': {} seeds, {} formations, {} groups",
            scenario.name,
            scenario.seeds.len(),
            scenario.formations.len(),
            scenario.forces.len()
        );
        Ok(scenario)
    }

    /// Validate a scenario, returning all issues found.
    pub fn validate(&self) -> Vec<ScenarioIssue> {
        let mut issues = Vec::new();

        if self.seeds.is_empty() {
            issues.push(ScenarioIssue::NoSeeds);
        }
        let canvas = self.settings.canvas;
        if !canvas.is_valid() {
            issues.push(ScenarioIssue::InvalidCanvas);
        }

        let padded = canvas.rect().expand(canvas.margin);
        let mut seed_ids = HashSet::new();
        for s in &self.seeds {
            if !seed_ids.insert(s.id) {
                issues.push(ScenarioIssue::DuplicateSeedId(s.id));
            }
            if canvas.is_valid() && !padded.contains(s.point()) {
                issues.push(ScenarioIssue::SeedOutsideCanvas(s.id));
            }
        }

        let formations: HashSet<&str> = self.formations.iter().map(|f| f.id.as_str()).collect();
        let mut group_ids = HashSet::new();
        for g in &self.forces {
            if !group_ids.insert(&g.id) {
                issues.push(ScenarioIssue::DuplicateGroupId(g.id.clone()));
            }
            if !seed_ids.contains(&g.region) {
                issues.push(ScenarioIssue::UnknownStartRegion(g.id.clone(), g.region));
            }
            if let Some(t) = g.target {
                if !seed_ids.contains(&t) {
                    issues.push(ScenarioIssue::UnknownTargetRegion(g.id.clone(), t));
                }
            }
            if !formations.contains(g.formation.as_str()) {
                issues.push(ScenarioIssue::UnknownFormation(
                    g.id.clone(),
                    g.formation.clone(),
                ));
            }
        }

        issues
    }
}
