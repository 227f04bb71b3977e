use std::path::Path;

use lane_core::{GridLocation, MobileKind, StationaryKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Scripted opponent activity, keyed by turn.
///
/// ```yaml
/// enemy_structures:
///   - { unit: turret, at: [13, 16], turn: 0 }
/// enemy_mobiles:
///   - { unit: scout, at: [13, 27], count: 6, turn: 3 }
/// breaches:
///   - { at: [5, 0], turn: 2 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub enemy_structures: Vec<ScenarioStructure>,
    #[serde(default)]
    pub enemy_mobiles: Vec<ScenarioMobile>,
    #[serde(default)]
    pub breaches: Vec<ScenarioBreach>,
}

/// Placed at the start of `turn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStructure {
    pub unit: StationaryKind,
    pub at: GridLocation,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub upgraded: bool,
}

/// Visible on the board for the whole of `turn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMobile {
    pub unit: MobileKind,
    pub at: GridLocation,
    #[serde(default = "one")]
    pub count: u32,
    pub turn: u32,
}

/// An enemy unit crossing the agent's edge during the action phase of `turn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBreach {
    pub at: GridLocation,
    pub turn: u32,
    #[serde(default = "one_damage")]
    pub damage: f64,
}

fn one() -> u32 {
    1
}

fn one_damage() -> f64 {
    1.0
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub(crate) fn structures_for(&self, turn: u32) -> impl Iterator<Item = &ScenarioStructure> {
        self.enemy_structures.iter().filter(move |s| s.turn == turn)
    }

    pub(crate) fn mobiles_for(&self, turn: u32) -> impl Iterator<Item = &ScenarioMobile> {
        self.enemy_mobiles.iter().filter(move |m| m.turn == turn)
    }

    pub(crate) fn breaches_for(&self, turn: u32) -> impl Iterator<Item = &ScenarioBreach> {
        self.breaches.iter().filter(move |b| b.turn == turn)
    }
}
