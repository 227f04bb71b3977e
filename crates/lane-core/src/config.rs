//! Match configuration, built once at match start from the config provider's document.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, UnitKind};

/// Stat changes applied when a stationary unit is upgraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeStats {
    pub structure_cost: f64,
    pub damage: Option<f64>,
    pub range: Option<f64>,
    pub health: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Wire shorthand the match server uses for this unit (e.g. `"FF"`).
    pub shorthand: String,
    pub structure_cost: f64,
    pub mobile_cost: f64,
    pub health: f64,
    /// Damage per attack against mobile units.
    pub damage: f64,
    pub range: f64,
    pub upgrade: Option<UpgradeStats>,
}

impl UnitStats {
    pub fn damage_for(&self, upgraded: bool) -> f64 {
        match (&self.upgrade, upgraded) {
            (Some(UpgradeStats { damage: Some(d), .. }), true) => *d,
            _ => self.damage,
        }
    }

    pub fn range_for(&self, upgraded: bool) -> f64 {
        match (&self.upgrade, upgraded) {
            (Some(UpgradeStats { range: Some(r), .. }), true) => *r,
            _ => self.range,
        }
    }
}

/// Immutable per-match unit table.
///
/// Constructed once when the match starts and passed explicitly to everything that needs unit
/// stats or the kind/shorthand mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    units: Vec<UnitStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameConfig {
    unit_information: Vec<RawUnitInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnitInformation {
    #[serde(default)]
    shorthand: String,
    #[serde(default)]
    cost1: f64,
    #[serde(default)]
    cost2: f64,
    #[serde(default)]
    start_health: f64,
    #[serde(default)]
    attack_damage_walker: f64,
    #[serde(default)]
    attack_range: f64,
    #[serde(default)]
    upgrade: Option<RawUpgrade>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUpgrade {
    #[serde(default)]
    cost1: f64,
    attack_damage_walker: Option<f64>,
    attack_range: Option<f64>,
    start_health: Option<f64>,
}

impl From<RawUnitInformation> for UnitStats {
    fn from(raw: RawUnitInformation) -> Self {
        Self {
            shorthand: raw.shorthand,
            structure_cost: raw.cost1,
            mobile_cost: raw.cost2,
            health: raw.start_health,
            damage: raw.attack_damage_walker,
            range: raw.attack_range,
            upgrade: raw.upgrade.map(|u| UpgradeStats {
                structure_cost: u.cost1,
                damage: u.attack_damage_walker,
                range: u.attack_range,
                health: u.start_health,
            }),
        }
    }
}

impl MatchConfig {
    /// Build from the config document delivered at match start.
    ///
    /// Only the first six `unitInformation` entries are read; the server appends pseudo-units
    /// (remove/upgrade markers) after them.
    pub fn from_game_config_json(document: &str) -> Result<Self, ConfigError> {
        let raw: RawGameConfig = serde_json::from_str(document)?;
        Self::from_raw(raw)
    }

    pub fn from_game_config(document: &serde_json::Value) -> Result<Self, ConfigError> {
        let raw = RawGameConfig::deserialize(document)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawGameConfig) -> Result<Self, ConfigError> {
        let found = raw.unit_information.len();
        if found < UnitKind::ALL.len() {
            return Err(ConfigError::MissingUnits { found });
        }

        let units: Vec<UnitStats> = raw
            .unit_information
            .into_iter()
            .take(UnitKind::ALL.len())
            .map(UnitStats::from)
            .collect();
        Self::from_stats(units)
    }

    /// Build from explicit per-kind stats, in [`UnitKind::ALL`] order.
    pub fn from_stats(units: Vec<UnitStats>) -> Result<Self, ConfigError> {
        if units.len() != UnitKind::ALL.len() {
            return Err(ConfigError::MissingUnits { found: units.len() });
        }
        for (i, a) in units.iter().enumerate() {
            if units[i + 1..].iter().any(|b| b.shorthand == a.shorthand) {
                return Err(ConfigError::DuplicateShorthand(a.shorthand.clone()));
            }
        }
        Ok(Self { units })
    }

    /// Default unit table used by offline runs and tests.
    pub fn standard() -> Self {
        let stationary = |shorthand: &str, cost: f64, health: f64, damage: f64, range: f64, upgrade| {
            UnitStats {
                shorthand: shorthand.to_string(),
                structure_cost: cost,
                mobile_cost: 0.0,
                health,
                damage,
                range,
                upgrade: Some(upgrade),
            }
        };
        let mobile = |shorthand: &str, cost: f64, health: f64, damage: f64, range: f64| UnitStats {
            shorthand: shorthand.to_string(),
            structure_cost: 0.0,
            mobile_cost: cost,
            health,
            damage,
            range,
            upgrade: None,
        };

        Self {
            units: vec![
                stationary(
                    "FF",
                    1.0,
                    60.0,
                    0.0,
                    0.0,
                    UpgradeStats {
                        structure_cost: 1.0,
                        damage: None,
                        range: None,
                        health: Some(120.0),
                    },
                ),
                stationary(
                    "EF",
                    4.0,
                    30.0,
                    0.0,
                    0.0,
                    UpgradeStats {
                        structure_cost: 4.0,
                        damage: None,
                        range: None,
                        health: None,
                    },
                ),
                stationary(
                    "DF",
                    2.0,
                    75.0,
                    5.0,
                    2.5,
                    UpgradeStats {
                        structure_cost: 4.0,
                        damage: Some(15.0),
                        range: Some(3.5),
                        health: None,
                    },
                ),
                mobile("PI", 1.0, 12.0, 2.0, 3.5),
                mobile("EI", 3.0, 5.0, 8.0, 4.5),
                mobile("SI", 1.0, 40.0, 20.0, 4.5),
            ],
        }
    }

    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        &self.units[kind.index()]
    }

    pub fn shorthand(&self, kind: UnitKind) -> &str {
        &self.stats(kind).shorthand
    }

    pub fn kind_for_shorthand(&self, shorthand: &str) -> Option<UnitKind> {
        UnitKind::ALL
            .into_iter()
            .find(|kind| self.stats(*kind).shorthand == shorthand)
    }

    /// Per-attack damage of a freshly placed turret, used as the representative attacker when
    /// estimating path damage.
    pub fn turret_damage(&self) -> f64 {
        self.stats(UnitKind::Turret).damage
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::standard()
    }
}
