//! Choosing and launching at most one attack per turn.

use lane_core::{BuildRequest, GridLocation, MatchConfig, MobileKind, PathView, ServiceError};
use serde::{Deserialize, Serialize};

use crate::spawn::{least_damage_spawn, DamageModel};
use crate::template::{expand, Placement};
use crate::ThreatSnapshot;

/// Where an attack's mobile units are spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchPoint {
    Fixed { at: GridLocation },
    /// Candidate with the least estimated path damage.
    Safest { candidates: Vec<GridLocation> },
    /// The lane with fewer enemy turrets; ties go left.
    FewerTurrets {
        left: GridLocation,
        right: GridLocation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitBatch {
    pub unit: MobileKind,
    /// Requested per batch; the service spawns as many as the agent can afford.
    pub count: u32,
}

impl UnitBatch {
    pub const fn new(unit: MobileKind, count: u32) -> Self {
        Self { unit, count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackPlan {
    pub name: String,
    /// Structures placed before the units go out (a wall line, funnel walls).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prep: Vec<Placement>,
    pub units: Vec<UnitBatch>,
    pub launch: LaunchPoint,
    #[serde(default)]
    pub min_mobile_points: f64,
}

impl AttackPlan {
    pub fn affordable(&self, mobile_points: f64) -> bool {
        mobile_points >= self.min_mobile_points
    }
}

/// Attack issued on the first turns of the match, after which the turn ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningRush {
    /// Last turn (inclusive) the rush runs on.
    pub through_turn: u32,
    /// Run before any defense is placed.
    #[serde(default)]
    pub before_defense: bool,
    pub attack: AttackPlan,
}

impl OpeningRush {
    pub fn is_active(&self, turn: u32) -> bool {
        turn <= self.through_turn
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenseConfig {
    pub from_turn: u32,
    /// Strictly more enemy turrets than this selects the heavy attack.
    pub heavy_turret_threshold: usize,
    /// Strictly more enemy interceptors than this forces the light attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_interceptor_threshold: Option<usize>,
    pub light: AttackPlan,
    pub heavy: AttackPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackChoice {
    Light,
    Heavy,
}

impl AttackChoice {
    pub fn plan(self, config: &OffenseConfig) -> &AttackPlan {
        match self {
            AttackChoice::Light => &config.light,
            AttackChoice::Heavy => &config.heavy,
        }
    }
}

/// Pick this turn's attack, if any.
///
/// There is no fallback: when the chosen plan's mobile-point minimum is not met the agent waits.
pub fn choose_attack(
    config: &OffenseConfig,
    threat: &ThreatSnapshot,
    mobile_points: f64,
) -> Option<AttackChoice> {
    if threat.turn < config.from_turn {
        return None;
    }

    let countered = config
        .counter_interceptor_threshold
        .is_some_and(|limit| threat.enemy_interceptors > limit);
    let choice = if countered {
        AttackChoice::Light
    } else if threat.enemy_turrets > config.heavy_turret_threshold {
        AttackChoice::Heavy
    } else {
        AttackChoice::Light
    };

    choice.plan(config).affordable(mobile_points).then_some(choice)
}

/// A resolved attack, ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchedAttack {
    pub name: String,
    pub launch: GridLocation,
    /// Set when the launch point came from the spawn selector.
    pub estimated_damage: Option<f64>,
    pub requests: Vec<BuildRequest>,
}

/// Resolve `plan`'s launch point and expand it into requests. Gating is the caller's job.
pub fn launch<V>(
    view: &V,
    config: &MatchConfig,
    model: DamageModel,
    plan: &AttackPlan,
    threat: &ThreatSnapshot,
) -> Result<Option<LaunchedAttack>, ServiceError>
where
    V: PathView + ?Sized,
{
    let (at, estimated_damage) = match &plan.launch {
        LaunchPoint::Fixed { at } => (*at, None),
        LaunchPoint::Safest { candidates } => {
            match least_damage_spawn(view, config, model, candidates)? {
                Some(score) => (score.location, Some(score.damage)),
                None => return Ok(None),
            }
        }
        LaunchPoint::FewerTurrets { left, right } => {
            if threat.enemy_turrets_left <= threat.enemy_turrets_right {
                (*left, None)
            } else {
                (*right, None)
            }
        }
    };

    let mut requests = expand(&plan.prep);
    requests.extend(
        plan.units
            .iter()
            .map(|batch| BuildRequest::spawn(batch.unit, at, batch.count)),
    );

    Ok(Some(LaunchedAttack {
        name: plan.name.clone(),
        launch: at,
        estimated_damage,
        requests,
    }))
}

pub fn plan_offense<V>(
    view: &V,
    match_config: &MatchConfig,
    model: DamageModel,
    config: &OffenseConfig,
    threat: &ThreatSnapshot,
    mobile_points: f64,
) -> Result<Option<LaunchedAttack>, ServiceError>
where
    V: PathView + ?Sized,
{
    match choose_attack(config, threat, mobile_points) {
        Some(choice) => launch(view, match_config, model, choice.plan(config), threat),
        None => Ok(None),
    }
}
