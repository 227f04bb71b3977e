//! Per-turn decision engine for a lane-combat bot.
//!
//! One [`DecisionEngine`] per match. Each turn it runs the planners in a fixed order against the
//! game service, parameterized by a [`PolicyProfile`]:
//!
//! 1. probe hook, then the opening rush if it is scheduled before defense
//! 2. [`defense`]: baseline templates and the optional funnel
//! 3. [`repair`]: rebuild one row in front of every recorded breach
//! 4. [`threat`]: count enemy units for this turn only
//! 5. [`contingency`] reactions, then [`offense`] (zero or one attack)
//! 6. [`economy`] upgrades and extra supports, then contingencies that wait for the economy
//!    pass, then submit

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod breach;
pub mod contingency;
pub mod defense;
pub mod economy;
pub mod engine;
pub mod offense;
pub mod profile;
pub mod repair;
pub mod spawn;
pub mod template;
pub mod threat;

pub use breach::{BreachEntry, BreachEvent, BreachLedger};
pub use contingency::{Contingency, ContingencyPhase, MobileSpawn, Trigger};
pub use defense::{plan_defense, DefenseConfig};
pub use economy::{EconomyRule, Threshold};
pub use engine::{DecisionEngine, DispatchedRequest, TurnError, TurnOutcome, TurnReport};
pub use lane_core::TurnPhase;
pub use offense::{
    choose_attack, plan_offense, AttackChoice, AttackPlan, LaunchPoint, LaunchedAttack,
    OffenseConfig, OpeningRush, UnitBatch,
};
pub use profile::{PolicyProfile, ProbeSpawn, ProfileError};
pub use repair::{plan_repairs, RepairConfig, RepairStep};
pub use spawn::{estimate_path_damage, least_damage_spawn, DamageModel, SpawnScore};
pub use template::{Placement, TemplateStage};
pub use threat::{
    detect_enemy_mobile_units, detect_enemy_unit, AxisRange, ThreatConfig, ThreatSnapshot,
    UnitFilter,
};
