use thiserror::Error;

use crate::GridLocation;

/// Failures reported by the external game-state / pathfinding services.
///
/// A rejected build is *not* an error: services report it as zero accepted units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("game service unavailable: {0}")]
    Unavailable(String),

    #[error("no path to the enemy edge from {location}")]
    Unreachable { location: GridLocation },

    #[error("game service protocol error: {0}")]
    Protocol(String),
}

/// Errors building a [`crate::MatchConfig`] from the match-start config document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unitInformation lists {found} units, expected at least 6")]
    MissingUnits { found: usize },

    #[error("shorthand {0:?} is used by more than one unit")]
    DuplicateShorthand(String),
}
