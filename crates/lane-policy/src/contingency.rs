//! Defensive reactions evaluated after threat assessment, either before the attack or once the
//! economy pass has spent its share.

use lane_core::{BuildRequest, GridLocation, MobileKind};
use serde::{Deserialize, Serialize};

use crate::template::{expand, Placement};
use crate::ThreatSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Trigger {
    /// More than `count` enemy mobile units of `unit` on the board.
    EnemyMobileAbove { unit: MobileKind, count: usize },
    /// Agent health strictly below `below`, from `from_turn` on.
    LowHealth {
        below: f64,
        #[serde(default)]
        from_turn: u32,
    },
    /// Every turn divisible by `n`. `n = 0` never fires.
    EveryNthTurn { n: u32 },
}

impl Trigger {
    pub fn fires(&self, threat: &ThreatSnapshot, health: f64) -> bool {
        match *self {
            Trigger::EnemyMobileAbove { unit, count } => threat.mobile(unit) > count,
            Trigger::LowHealth { below, from_turn } => threat.turn >= from_turn && health < below,
            Trigger::EveryNthTurn { n } => n != 0 && threat.turn % n == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobileSpawn {
    pub unit: MobileKind,
    pub at: GridLocation,
    pub count: u32,
    #[serde(default)]
    pub min_mobile_points: f64,
}

/// Where in the turn a contingency runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContingencyPhase {
    #[default]
    BeforeAttack,
    /// After the economy pass, so economy thresholds see the balance before this spends it.
    AfterEconomy,
}

impl ContingencyPhase {
    fn is_default(&self) -> bool {
        *self == Self::BeforeAttack
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contingency {
    pub name: String,
    pub trigger: Trigger,
    #[serde(default, skip_serializing_if = "ContingencyPhase::is_default")]
    pub phase: ContingencyPhase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placements: Vec<Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn: Option<MobileSpawn>,
}

impl Contingency {
    /// Requests for a fired contingency. The spawn is skipped below its mobile-point minimum.
    pub fn respond(&self, mobile_points: f64) -> Vec<BuildRequest> {
        let mut out = expand(&self.placements);
        if let Some(spawn) = self.spawn {
            if mobile_points >= spawn.min_mobile_points {
                out.push(BuildRequest::spawn(spawn.unit, spawn.at, spawn.count));
            }
        }
        out
    }
}
