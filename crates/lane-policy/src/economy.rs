use lane_core::{BuildRequest, ResourceKind};
use serde::{Deserialize, Serialize};

use crate::template::{expand, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    AtLeast(f64),
    Above(f64),
}

impl Threshold {
    pub fn admits(self, balance: f64) -> bool {
        match self {
            Threshold::AtLeast(v) => balance >= v,
            Threshold::Above(v) => balance > v,
        }
    }
}

/// Spend surplus: extra supports, upgrades of the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyRule {
    pub name: String,
    pub resource: ResourceKind,
    pub threshold: Threshold,
    #[serde(default)]
    pub from_turn: u32,
    pub placements: Vec<Placement>,
}

impl EconomyRule {
    pub fn applies(&self, turn: u32, balance: f64) -> bool {
        turn >= self.from_turn && self.threshold.admits(balance)
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        expand(&self.placements)
    }
}
