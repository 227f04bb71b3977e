//! Policy profiles: the data that turns one engine into a particular bot.
//!
//! Three built-in presets cover a balanced bot (`standard`), an early-pressure bot
//! (`aggressive`) and a bot that adapts its defense and attack size (`dynamic`). Any profile can
//! be written to and read from YAML.

use std::path::Path;

use lane_core::{GridLocation, MobileKind, ResourceKind, StationaryKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    AttackPlan, AxisRange, Contingency, ContingencyPhase, DamageModel, DefenseConfig, EconomyRule,
    LaunchPoint, MobileSpawn, OffenseConfig, OpeningRush, Placement, RepairConfig, RepairStep,
    TemplateStage, ThreatConfig, Threshold, Trigger, UnitBatch,
};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown profile preset {0:?} (expected one of: standard, aggressive, dynamic)")]
    UnknownPreset(String),
}

/// A spawn issued at the very start of every turn, before the policy runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeSpawn {
    pub unit: MobileKind,
    pub at: GridLocation,
    pub count: u32,
    /// Last turn (inclusive) to probe on. Unset means every turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through_turn: Option<u32>,
}

impl ProbeSpawn {
    pub fn is_active(&self, turn: u32) -> bool {
        self.through_turn.map_or(true, |last| turn <= last)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeSpawn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening: Option<OpeningRush>,
    pub defense: DefenseConfig,
    #[serde(default)]
    pub repair: RepairConfig,
    #[serde(default)]
    pub threat: ThreatConfig,
    #[serde(default)]
    pub contingencies: Vec<Contingency>,
    pub offense: OffenseConfig,
    #[serde(default)]
    pub economy: Vec<EconomyRule>,
    #[serde(default)]
    pub damage_model: DamageModel,
}

const CENTER_SPAWNS: [[i32; 2]; 2] = [[13, 0], [14, 0]];
const CENTER_LEFT: GridLocation = GridLocation::new(13, 0);
const PROBE_AT: GridLocation = GridLocation::new(24, 10);

fn all_out(unit: MobileKind) -> Vec<UnitBatch> {
    vec![UnitBatch::new(unit, 1000)]
}

fn safest_center() -> LaunchPoint {
    LaunchPoint::Safest {
        candidates: CENTER_SPAWNS.iter().copied().map(GridLocation::from).collect(),
    }
}

fn interceptors(count: u32, min_mobile_points: f64) -> Option<MobileSpawn> {
    Some(MobileSpawn {
        unit: MobileKind::Interceptor,
        at: CENTER_LEFT,
        count,
        min_mobile_points,
    })
}

fn place_and_upgrade(unit: StationaryKind, at: &[[i32; 2]]) -> [Placement; 2] {
    [
        Placement::place(unit, at.iter().copied()),
        Placement::upgrade(at.iter().copied()),
    ]
}

impl PolicyProfile {
    pub const PRESETS: [&'static str; 3] = ["standard", "aggressive", "dynamic"];

    pub fn preset(name: &str) -> Result<Self, ProfileError> {
        match name {
            "standard" => Ok(Self::standard()),
            "aggressive" => Ok(Self::aggressive()),
            "dynamic" => Ok(Self::dynamic()),
            other => Err(ProfileError::UnknownPreset(other.to_string())),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ProfileError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ProfileError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Corner walls, flank turrets and a support block; scout rush on the first two turns, then
    /// scouts or a demolisher push depending on the enemy's front-line turrets.
    pub fn standard() -> Self {
        let heavy_walls: Vec<[i32; 2]> = (5..=22).map(|x| [x, 12]).collect();

        Self {
            name: "standard".into(),
            probe: Some(ProbeSpawn {
                unit: MobileKind::Demolisher,
                at: PROBE_AT,
                count: 3,
                through_turn: None,
            }),
            opening: Some(OpeningRush {
                through_turn: 1,
                before_defense: true,
                attack: AttackPlan {
                    name: "cheese_rush".into(),
                    prep: Vec::new(),
                    units: all_out(MobileKind::Scout),
                    launch: safest_center(),
                    min_mobile_points: 0.0,
                },
            }),
            defense: DefenseConfig {
                stages: vec![TemplateStage::new(vec![
                    Placement::place(
                        StationaryKind::Wall,
                        [[0, 13], [1, 13], [2, 13], [3, 13], [24, 13], [25, 13], [26, 13], [27, 13]],
                    ),
                    Placement::place(StationaryKind::Turret, [[3, 12], [24, 12], [6, 11], [21, 11]]),
                    Placement::place(StationaryKind::Support, [[13, 2], [14, 2], [13, 3], [14, 3]]),
                ])],
                funnel: Vec::new(),
            },
            repair: RepairConfig::default(),
            threat: ThreatConfig {
                turret_y: Some(AxisRange::new(14, 15)),
                ..ThreatConfig::default()
            },
            contingencies: vec![
                Contingency {
                    name: "scout_defense".into(),
                    phase: ContingencyPhase::BeforeAttack,
                    trigger: Trigger::EnemyMobileAbove {
                        unit: MobileKind::Scout,
                        count: 5,
                    },
                    placements: vec![Placement::reinforce(
                        StationaryKind::Turret,
                        [[13, 12], [14, 12], [12, 11], [15, 11]],
                    )],
                    spawn: interceptors(2, 2.0),
                },
                Contingency {
                    name: "heavy_defense".into(),
                    trigger: Trigger::LowHealth {
                        below: 15.0,
                        from_turn: 5,
                    },
                    phase: ContingencyPhase::AfterEconomy,
                    placements: vec![
                        Placement::place(StationaryKind::Wall, heavy_walls),
                        Placement::reinforce(StationaryKind::Turret, [[5, 11], [22, 11]]),
                    ],
                    spawn: None,
                },
            ],
            offense: OffenseConfig {
                from_turn: 3,
                heavy_turret_threshold: 4,
                counter_interceptor_threshold: Some(5),
                light: AttackPlan {
                    name: "scout_rush".into(),
                    prep: Vec::new(),
                    units: all_out(MobileKind::Scout),
                    launch: safest_center(),
                    min_mobile_points: 1.0,
                },
                heavy: AttackPlan {
                    name: "demolisher_attack".into(),
                    prep: vec![Placement::place(
                        StationaryKind::Wall,
                        [[5, 11], [8, 11], [11, 11], [14, 11], [17, 11], [20, 11]],
                    )],
                    units: all_out(MobileKind::Demolisher),
                    launch: LaunchPoint::Fixed { at: CENTER_LEFT },
                    min_mobile_points: 3.0,
                },
            },
            economy: vec![
                EconomyRule {
                    name: "upgrade_defenses".into(),
                    resource: ResourceKind::StructurePoints,
                    threshold: Threshold::Above(15.0),
                    from_turn: 0,
                    placements: vec![
                        Placement::upgrade([[0, 13], [1, 13], [26, 13], [27, 13]]),
                        Placement::upgrade([[13, 2], [14, 2]]),
                        Placement::upgrade([[3, 12], [24, 12]]),
                    ],
                },
                EconomyRule {
                    name: "extra_supports".into(),
                    resource: ResourceKind::MobilePoints,
                    threshold: Threshold::Above(12.0),
                    from_turn: 0,
                    placements: place_and_upgrade(
                        StationaryKind::Support,
                        &[[12, 3], [15, 3], [12, 4], [15, 4]],
                    )
                    .into(),
                },
            ],
            damage_model: DamageModel::RepresentativeTurret,
        }
    }

    /// A compact upgraded core in the middle and all-in attacks from turn 2 once enough mobile
    /// points are banked.
    pub fn aggressive() -> Self {
        let core_walls = [[13, 11], [14, 11], [12, 11], [15, 11]];
        let core_turrets = [[13, 10], [14, 10]];
        let supports = [[13, 2], [14, 2], [12, 3], [15, 3]];

        let mut core = place_and_upgrade(StationaryKind::Wall, &core_walls).to_vec();
        core.extend(place_and_upgrade(StationaryKind::Turret, &core_turrets));

        Self {
            name: "aggressive".into(),
            probe: None,
            opening: Some(OpeningRush {
                through_turn: 1,
                before_defense: false,
                attack: AttackPlan {
                    name: "opening_scouts".into(),
                    prep: Vec::new(),
                    units: all_out(MobileKind::Scout),
                    launch: safest_center(),
                    min_mobile_points: 0.0,
                },
            }),
            defense: DefenseConfig {
                stages: vec![TemplateStage::new(core)],
                funnel: Vec::new(),
            },
            repair: RepairConfig {
                steps: vec![
                    RepairStep::Place {
                        unit: StationaryKind::Wall,
                    },
                    RepairStep::Upgrade,
                    RepairStep::Place {
                        unit: StationaryKind::Turret,
                    },
                    RepairStep::Upgrade,
                ],
            },
            threat: ThreatConfig::default(),
            contingencies: vec![Contingency {
                name: "emergency_defense".into(),
                phase: ContingencyPhase::BeforeAttack,
                trigger: Trigger::LowHealth {
                    below: 15.0,
                    from_turn: 4,
                },
                placements: vec![Placement::reinforce(
                    StationaryKind::Turret,
                    [[11, 10], [16, 10]],
                )],
                spawn: interceptors(3, 3.0),
            }],
            offense: OffenseConfig {
                from_turn: 2,
                heavy_turret_threshold: 4,
                counter_interceptor_threshold: None,
                light: AttackPlan {
                    name: "scout_swarm".into(),
                    prep: Vec::new(),
                    units: all_out(MobileKind::Scout),
                    launch: safest_center(),
                    min_mobile_points: 6.0,
                },
                heavy: AttackPlan {
                    name: "demolisher_line_push".into(),
                    prep: Vec::new(),
                    units: all_out(MobileKind::Demolisher),
                    launch: LaunchPoint::Fixed { at: CENTER_LEFT },
                    min_mobile_points: 6.0,
                },
            },
            economy: vec![EconomyRule {
                name: "late_supports".into(),
                resource: ResourceKind::StructurePoints,
                threshold: Threshold::AtLeast(8.0),
                from_turn: 11,
                placements: place_and_upgrade(StationaryKind::Support, &supports).into(),
            }],
            damage_model: DamageModel::RepresentativeTurret,
        }
    }

    /// A reinforced three-row center with a funnel near the spawn; small scout pressure waves
    /// and interceptor screens every other turn.
    pub fn dynamic() -> Self {
        let center_walls = [
            [13, 13], [14, 13], [12, 13], [15, 13], [11, 13], [16, 13],
            [13, 12], [14, 12], [12, 12], [15, 12], [11, 12], [16, 12],
            [13, 11], [14, 11], [12, 11], [15, 11],
        ];
        let funnel = [[12, 1], [13, 1], [14, 1], [15, 1], [12, 2], [13, 2], [14, 2], [15, 2]];
        let supports = [[13, 3], [14, 3], [13, 4], [14, 4], [12, 3], [15, 3]];

        Self {
            name: "dynamic".into(),
            probe: Some(ProbeSpawn {
                unit: MobileKind::Demolisher,
                at: PROBE_AT,
                count: 3,
                through_turn: None,
            }),
            opening: Some(OpeningRush {
                through_turn: 1,
                before_defense: false,
                attack: AttackPlan {
                    name: "opening_scouts".into(),
                    prep: Vec::new(),
                    units: all_out(MobileKind::Scout),
                    launch: safest_center(),
                    min_mobile_points: 0.0,
                },
            }),
            defense: DefenseConfig {
                stages: vec![TemplateStage::new(vec![
                    Placement::reinforce(StationaryKind::Wall, center_walls),
                    Placement::reinforce(
                        StationaryKind::Turret,
                        [[3, 12], [24, 12], [13, 10], [14, 10]],
                    ),
                ])],
                funnel: place_and_upgrade(StationaryKind::Wall, &funnel).into(),
            },
            repair: RepairConfig {
                steps: vec![
                    RepairStep::Place {
                        unit: StationaryKind::Wall,
                    },
                    RepairStep::Place {
                        unit: StationaryKind::Turret,
                    },
                    RepairStep::Upgrade,
                ],
            },
            threat: ThreatConfig::default(),
            contingencies: vec![
                Contingency {
                    name: "scout_screen".into(),
                    phase: ContingencyPhase::BeforeAttack,
                    trigger: Trigger::EnemyMobileAbove {
                        unit: MobileKind::Scout,
                        count: 5,
                    },
                    placements: vec![Placement::reinforce(
                        StationaryKind::Turret,
                        [[12, 10], [13, 10], [14, 10], [15, 10]],
                    )],
                    spawn: interceptors(2, 3.0),
                },
                Contingency {
                    name: "interceptor_cycle".into(),
                    phase: ContingencyPhase::BeforeAttack,
                    trigger: Trigger::EveryNthTurn { n: 2 },
                    placements: Vec::new(),
                    spawn: interceptors(2, 2.0),
                },
            ],
            offense: OffenseConfig {
                from_turn: 2,
                heavy_turret_threshold: 4,
                counter_interceptor_threshold: None,
                light: AttackPlan {
                    name: "scout_pressure".into(),
                    prep: Vec::new(),
                    units: vec![UnitBatch::new(MobileKind::Scout, 3)],
                    launch: safest_center(),
                    min_mobile_points: 1.0,
                },
                heavy: AttackPlan {
                    name: "demolisher_push_with_funnel".into(),
                    prep: place_and_upgrade(
                        StationaryKind::Wall,
                        &[[6, 11], [9, 11], [18, 11], [21, 11]],
                    )
                    .into(),
                    units: all_out(MobileKind::Demolisher),
                    launch: LaunchPoint::Fixed { at: CENTER_LEFT },
                    min_mobile_points: 3.0,
                },
            },
            economy: vec![EconomyRule {
                name: "support_block".into(),
                resource: ResourceKind::StructurePoints,
                threshold: Threshold::AtLeast(10.0),
                from_turn: 0,
                placements: place_and_upgrade(StationaryKind::Support, &supports).into(),
            }],
            damage_model: DamageModel::PerAttacker,
        }
    }
}

impl Default for PolicyProfile {
    fn default() -> Self {
        Self::standard()
    }
}
