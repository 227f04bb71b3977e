use lane_core::{BuildRequest, StationaryKind};
use serde::{Deserialize, Serialize};

use crate::BreachLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RepairStep {
    Place { unit: StationaryKind },
    Upgrade,
}

/// What to build one row in front of each breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairConfig {
    pub steps: Vec<RepairStep>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                RepairStep::Place {
                    unit: StationaryKind::Turret,
                },
                RepairStep::Place {
                    unit: StationaryKind::Wall,
                },
                RepairStep::Upgrade,
            ],
        }
    }
}

/// Repairs for the whole breach history, not just the last turn.
///
/// Each breached location gets the configured steps at `(x, y + 1)`; a location breached on
/// several turns is repaired once.
pub fn plan_repairs(ledger: &BreachLedger, config: &RepairConfig) -> Vec<BuildRequest> {
    let mut out = Vec::new();
    for target in ledger.locations().into_iter().map(|l| l.step_forward()) {
        for step in &config.steps {
            out.push(match step {
                RepairStep::Place { unit } => BuildRequest::place(*unit, vec![target]),
                RepairStep::Upgrade => BuildRequest::upgrade(vec![target]),
            });
        }
    }
    out
}
