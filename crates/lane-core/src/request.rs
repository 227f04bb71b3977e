use serde::{Deserialize, Serialize};

use crate::{GridLocation, MobileKind, ServiceError, StationaryKind, TurnSink, UnitKind};

/// The step of a decision pass that issued a request, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Probe,
    Opening,
    Defense,
    Repair,
    Contingency,
    Attack,
    Economy,
}

/// A build, spawn or upgrade intent.
///
/// Legality (cost, occupancy, bounds) is decided by the service when the request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildRequest {
    Spawn {
        unit: UnitKind,
        locations: Vec<GridLocation>,
        /// Units per location. Always `1` for stationary units.
        count: u32,
    },
    Upgrade {
        locations: Vec<GridLocation>,
    },
}

impl BuildRequest {
    pub fn place(unit: StationaryKind, locations: impl Into<Vec<GridLocation>>) -> Self {
        Self::Spawn {
            unit: unit.into(),
            locations: locations.into(),
            count: 1,
        }
    }

    pub fn spawn(unit: MobileKind, location: GridLocation, count: u32) -> Self {
        Self::Spawn {
            unit: unit.into(),
            locations: vec![location],
            count,
        }
    }

    pub fn upgrade(locations: impl Into<Vec<GridLocation>>) -> Self {
        Self::Upgrade {
            locations: locations.into(),
        }
    }

    pub fn unit(&self) -> Option<UnitKind> {
        match self {
            BuildRequest::Spawn { unit, .. } => Some(*unit),
            BuildRequest::Upgrade { .. } => None,
        }
    }

    pub fn locations(&self) -> &[GridLocation] {
        match self {
            BuildRequest::Spawn { locations, .. } | BuildRequest::Upgrade { locations } => locations,
        }
    }

    /// Mobile spawns are the only requests that send units toward the opponent.
    pub fn is_mobile_spawn(&self) -> bool {
        self.unit().and_then(UnitKind::as_mobile).is_some()
    }

    /// Forward to the sink. Returns the number of accepted units.
    pub fn dispatch<S>(&self, sink: &mut S) -> Result<u32, ServiceError>
    where
        S: TurnSink + ?Sized,
    {
        match self {
            BuildRequest::Spawn {
                unit,
                locations,
                count,
            } => sink.attempt_spawn(*unit, locations, *count),
            BuildRequest::Upgrade { locations } => sink.attempt_upgrade(locations),
        }
    }
}
