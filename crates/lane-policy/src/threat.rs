//! Counting what the opponent has on the board.
//!
//! Both primitives are pure scans of the service's current snapshot. Nothing here is cached: a
//! [`ThreatSnapshot`] belongs to the turn it was taken on.

use lane_core::{BoardView, GridLocation, MobileKind, ServiceError, Side, StationaryKind};
use serde::{Deserialize, Serialize};

/// Inclusive coordinate range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: i32) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Which enemy stationary units to count. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<StationaryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisRange>,
}

impl UnitFilter {
    pub fn unit(kind: StationaryKind) -> Self {
        Self {
            unit: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_x(mut self, range: AxisRange) -> Self {
        self.x = Some(range);
        self
    }

    pub fn with_y(mut self, range: AxisRange) -> Self {
        self.y = Some(range);
        self
    }

    fn admits_location(&self, loc: GridLocation) -> bool {
        self.x.map_or(true, |r| r.contains(loc.x)) && self.y.map_or(true, |r| r.contains(loc.y))
    }
}

/// Count enemy stationary units matching `filter`.
pub fn detect_enemy_unit<V>(view: &V, filter: &UnitFilter) -> Result<usize, ServiceError>
where
    V: BoardView + ?Sized,
{
    let mut total = 0;
    for loc in view.occupied_locations()? {
        if !filter.admits_location(loc) {
            continue;
        }
        total += view
            .units_at(loc)?
            .iter()
            .filter(|u| u.owner == Side::Enemy)
            .filter_map(|u| u.kind.as_stationary())
            .filter(|kind| filter.unit.map_or(true, |want| want == *kind))
            .count();
    }
    Ok(total)
}

/// Count enemy mobile units of `kind` standing on tiles without a stationary unit.
pub fn detect_enemy_mobile_units<V>(view: &V, kind: MobileKind) -> Result<usize, ServiceError>
where
    V: BoardView + ?Sized,
{
    let mut total = 0;
    for loc in view.occupied_locations()? {
        if view.contains_stationary_unit(loc)? {
            continue;
        }
        total += view
            .units_at(loc)?
            .iter()
            .filter(|u| u.owner == Side::Enemy && u.kind.as_mobile() == Some(kind))
            .count();
    }
    Ok(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// Region in which enemy turrets count toward the heavy-attack decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turret_x: Option<AxisRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turret_y: Option<AxisRange>,
    /// Columns below this are the left lane.
    pub lane_split_x: i32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            turret_x: None,
            turret_y: None,
            lane_split_x: 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatSnapshot {
    pub turn: u32,
    /// Enemy turrets inside the configured region.
    pub enemy_turrets: usize,
    pub enemy_turrets_total: usize,
    pub enemy_turrets_left: usize,
    pub enemy_turrets_right: usize,
    pub enemy_scouts: usize,
    pub enemy_demolishers: usize,
    pub enemy_interceptors: usize,
}

impl ThreatSnapshot {
    pub fn assess<V>(view: &V, config: &ThreatConfig) -> Result<Self, ServiceError>
    where
        V: BoardView + ?Sized,
    {
        let turrets = UnitFilter::unit(StationaryKind::Turret);
        let region = UnitFilter {
            x: config.turret_x,
            y: config.turret_y,
            ..turrets
        };
        let left = turrets.with_x(AxisRange::new(i32::MIN, config.lane_split_x - 1));
        let right = turrets.with_x(AxisRange::new(config.lane_split_x, i32::MAX));

        Ok(Self {
            turn: view.turn_number(),
            enemy_turrets: detect_enemy_unit(view, &region)?,
            enemy_turrets_total: detect_enemy_unit(view, &turrets)?,
            enemy_turrets_left: detect_enemy_unit(view, &left)?,
            enemy_turrets_right: detect_enemy_unit(view, &right)?,
            enemy_scouts: detect_enemy_mobile_units(view, MobileKind::Scout)?,
            enemy_demolishers: detect_enemy_mobile_units(view, MobileKind::Demolisher)?,
            enemy_interceptors: detect_enemy_mobile_units(view, MobileKind::Interceptor)?,
        })
    }

    pub fn mobile(&self, kind: MobileKind) -> usize {
        match kind {
            MobileKind::Scout => self.enemy_scouts,
            MobileKind::Demolisher => self.enemy_demolishers,
            MobileKind::Interceptor => self.enemy_interceptors,
        }
    }
}
