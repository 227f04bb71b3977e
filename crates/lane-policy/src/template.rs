//! Placement templates shared by the defense, offense, contingency and economy planners.

use lane_core::{BuildRequest, GridLocation, StationaryKind};
use serde::{Deserialize, Serialize};

/// One templated build step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Placement {
    /// Place `unit` on every location, as one request.
    Place {
        unit: StationaryKind,
        at: Vec<GridLocation>,
    },
    /// Upgrade every location, as one request.
    Upgrade { at: Vec<GridLocation> },
    /// Place then immediately upgrade, location by location.
    Reinforce {
        unit: StationaryKind,
        at: Vec<GridLocation>,
    },
}

impl Placement {
    pub fn place<L: Into<GridLocation>>(unit: StationaryKind, at: impl IntoIterator<Item = L>) -> Self {
        Placement::Place {
            unit,
            at: at.into_iter().map(Into::into).collect(),
        }
    }

    pub fn upgrade<L: Into<GridLocation>>(at: impl IntoIterator<Item = L>) -> Self {
        Placement::Upgrade {
            at: at.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reinforce<L: Into<GridLocation>>(
        unit: StationaryKind,
        at: impl IntoIterator<Item = L>,
    ) -> Self {
        Placement::Reinforce {
            unit,
            at: at.into_iter().map(Into::into).collect(),
        }
    }

    pub fn locations(&self) -> &[GridLocation] {
        match self {
            Placement::Place { at, .. }
            | Placement::Upgrade { at }
            | Placement::Reinforce { at, .. } => at,
        }
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        match self {
            Placement::Place { unit, at } if !at.is_empty() => {
                vec![BuildRequest::place(*unit, at.clone())]
            }
            Placement::Upgrade { at } if !at.is_empty() => vec![BuildRequest::upgrade(at.clone())],
            Placement::Reinforce { unit, at } => at
                .iter()
                .flat_map(|loc| {
                    [
                        BuildRequest::place(*unit, vec![*loc]),
                        BuildRequest::upgrade(vec![*loc]),
                    ]
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub(crate) fn expand(placements: &[Placement]) -> Vec<BuildRequest> {
    placements.iter().flat_map(Placement::requests).collect()
}

/// Placements that become active at `from_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStage {
    #[serde(default)]
    pub from_turn: u32,
    pub placements: Vec<Placement>,
}

impl TemplateStage {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self {
            from_turn: 0,
            placements,
        }
    }

    pub fn from_turn(mut self, turn: u32) -> Self {
        self.from_turn = turn;
        self
    }

    pub fn is_active(&self, turn: u32) -> bool {
        turn >= self.from_turn
    }
}
