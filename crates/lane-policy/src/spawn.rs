//! Damage-minimizing spawn selection.
//!
//! The estimate is static: it walks the pathfinder's route once and adds up who could shoot at
//! each tile. It does not simulate combat, unit health, or the route changing as structures die.

use lane_core::{GridLocation, MatchConfig, PathView, ServiceError, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the attackers covering a path tile turn into damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageModel {
    /// Attacker count times the damage of a fresh turret.
    #[default]
    RepresentativeTurret,
    /// Each attacker's own damage, so upgraded turrets weigh more.
    PerAttacker,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnScore {
    pub location: GridLocation,
    pub damage: f64,
}

/// Estimated damage taken by a unit walking from `start` to the enemy edge.
///
/// No route (an empty path or [`ServiceError::Unreachable`]) scores `+inf`.
pub fn estimate_path_damage<V>(
    view: &V,
    config: &MatchConfig,
    model: DamageModel,
    start: GridLocation,
) -> Result<f64, ServiceError>
where
    V: PathView + ?Sized,
{
    let path = match view.find_path_to_edge(start) {
        Ok(path) => path,
        Err(ServiceError::Unreachable { .. }) => return Ok(f64::INFINITY),
        Err(err) => return Err(err),
    };
    if path.is_empty() {
        return Ok(f64::INFINITY);
    }

    let mut damage = 0.0;
    for loc in path {
        let attackers = view.attackers(loc, Side::Friendly)?;
        damage += match model {
            DamageModel::RepresentativeTurret => attackers.len() as f64 * config.turret_damage(),
            DamageModel::PerAttacker => attackers.iter().map(|a| a.damage).sum(),
        };
    }
    Ok(if damage.is_nan() { f64::INFINITY } else { damage })
}

/// The candidate with the strictly smallest estimated damage; ties go to the earliest candidate.
///
/// Returns `None` only when `candidates` is empty. If every candidate is unreachable the first one
/// is returned with infinite damage.
pub fn least_damage_spawn<V>(
    view: &V,
    config: &MatchConfig,
    model: DamageModel,
    candidates: &[GridLocation],
) -> Result<Option<SpawnScore>, ServiceError>
where
    V: PathView + ?Sized,
{
    let mut best: Option<SpawnScore> = None;
    for &location in candidates {
        let damage = estimate_path_damage(view, config, model, location)?;
        debug!(at = %location, damage, "spawn candidate");
        if best.map_or(true, |b| damage < b.damage) {
            best = Some(SpawnScore { location, damage });
        }
    }
    Ok(best)
}
