use std::cell::Cell;
use std::collections::BTreeMap;

use lane_core::{
    BoardView, GridLocation, MatchConfig, MobileKind, PathView, ResourceKind, ServiceError, Side,
    StationaryKind, TurnSink, UnitInfo, UnitKind,
};
use lane_nav::{Arena, EdgePathfinder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Scenario;

/// Economy and board parameters for a sandbox match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub arena_size: u32,
    pub starting_structure_points: f64,
    pub structure_income: f64,
    pub starting_mobile_points: f64,
    pub mobile_income: f64,
    /// Fraction of unspent mobile points lost at the end of each turn.
    pub mobile_decay: f64,
    pub starting_health: f64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            arena_size: 28,
            starting_structure_points: 40.0,
            structure_income: 5.0,
            starting_mobile_points: 5.0,
            mobile_income: 5.0,
            mobile_decay: 0.25,
            starting_health: 30.0,
        }
    }
}

/// A request the sandbox accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SandboxAction {
    Spawned {
        unit: UnitKind,
        location: GridLocation,
        count: u32,
    },
    Upgraded {
        location: GridLocation,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub actions: Vec<SandboxAction>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Unit {
    kind: UnitKind,
    owner: Side,
    health: f64,
    upgraded: bool,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    structure_points: f64,
    mobile_points: f64,
    units: BTreeMap<GridLocation, Vec<Unit>>,
}

/// In-memory board implementing [`BoardView`], [`PathView`] and [`TurnSink`].
///
/// Legality mirrors the broad rules of the match server: stationary units go on free tiles in the
/// agent's half, mobile units go on the agent's two bottom edges, and every unit costs what the
/// [`MatchConfig`] says. Mobile spawns are capped by what the agent can afford.
#[derive(Debug, Clone)]
pub struct Sandbox {
    match_config: MatchConfig,
    config: SandboxConfig,
    pathfinder: EdgePathfinder,
    turn: u32,
    structure_points: f64,
    mobile_points: f64,
    health: f64,
    units: BTreeMap<GridLocation, Vec<Unit>>,
    checkpoint: Option<Checkpoint>,
    queued: Vec<SandboxAction>,
    history: Vec<TurnRecord>,
    scenario: Scenario,
    frames: Vec<String>,
    unavailable: Option<String>,
    call_budget: Cell<Option<usize>>,
    submit_failure: Option<String>,
    next_unit_id: u64,
}

impl Sandbox {
    pub fn new(match_config: MatchConfig) -> Self {
        Self::with_config(match_config, SandboxConfig::default())
    }

    pub fn with_config(match_config: MatchConfig, config: SandboxConfig) -> Self {
        let arena = Arena::new(config.arena_size);
        Self {
            match_config,
            pathfinder: EdgePathfinder::new(arena),
            turn: 0,
            structure_points: config.starting_structure_points,
            mobile_points: config.starting_mobile_points,
            health: config.starting_health,
            config,
            units: BTreeMap::new(),
            checkpoint: None,
            queued: Vec::new(),
            history: Vec::new(),
            scenario: Scenario::default(),
            frames: Vec::new(),
            unavailable: None,
            call_budget: Cell::new(None),
            submit_failure: None,
            next_unit_id: 1,
        }
    }

    /// Install a scripted opponent. Events for the current turn are applied immediately.
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self.apply_turn_start();
        self
    }

    pub fn arena(&self) -> &Arena {
        self.pathfinder.arena()
    }

    pub fn match_config(&self) -> &MatchConfig {
        &self.match_config
    }

    /// Requests accepted so far this turn.
    pub fn queued(&self) -> &[SandboxAction] {
        &self.queued
    }

    /// Accepted requests of every submitted turn, oldest first.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Action frames produced by submitted turns, as the transport would deliver them.
    pub fn drain_action_frames(&mut self) -> Vec<String> {
        std::mem::take(&mut self.frames)
    }

    pub fn count_units(&self, owner: Side, kind: UnitKind) -> usize {
        self.units
            .values()
            .flatten()
            .filter(|u| u.owner == owner && u.kind == kind)
            .count()
    }

    pub fn is_upgraded(&self, location: GridLocation) -> bool {
        self.stationary_at(location).is_some_and(|u| u.upgraded)
    }

    pub fn set_resource(&mut self, kind: ResourceKind, value: f64) {
        match kind {
            ResourceKind::StructurePoints => self.structure_points = value,
            ResourceKind::MobilePoints => self.mobile_points = value,
        }
    }

    pub fn set_health(&mut self, health: f64) {
        self.health = health;
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// While set, every board query and build request fails with
    /// [`ServiceError::Unavailable`]. Submission is unaffected.
    pub fn set_unavailable(&mut self, reason: Option<&str>) {
        self.unavailable = reason.map(str::to_string);
    }

    /// Allow `calls` more queries or requests, then behave as unavailable.
    pub fn fail_after(&mut self, calls: usize) {
        self.call_budget.set(Some(calls));
    }

    /// While set, [`TurnSink::submit_turn`] fails.
    pub fn set_submit_failure(&mut self, reason: Option<&str>) {
        self.submit_failure = reason.map(str::to_string);
    }

    /// Place an opponent structure, free of charge. Returns `false` if the tile is taken or not in
    /// the opponent's half.
    pub fn place_enemy(&mut self, kind: StationaryKind, location: GridLocation, upgraded: bool) -> bool {
        let arena = *self.arena();
        if !arena.in_bounds(location)
            || arena.in_friendly_half(location)
            || self.stationary_at(location).is_some()
        {
            return false;
        }
        self.push_unit(location, kind.into(), Side::Enemy, upgraded);
        true
    }

    /// Place an agent structure, free of charge. Returns `false` where an agent placement would be
    /// rejected.
    pub fn place_friendly(&mut self, kind: StationaryKind, location: GridLocation) -> bool {
        if !self.can_place_friendly(location) {
            return false;
        }
        self.push_unit(location, kind.into(), Side::Friendly, false);
        true
    }

    /// Put opponent mobile units on the board for the rest of this turn.
    pub fn spawn_enemy_mobile(&mut self, kind: MobileKind, location: GridLocation, count: u32) {
        if !self.arena().in_bounds(location) {
            return;
        }
        for _ in 0..count {
            self.push_unit(location, kind.into(), Side::Enemy, false);
        }
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        if let Some(reason) = &self.unavailable {
            return Err(ServiceError::Unavailable(reason.clone()));
        }
        match self.call_budget.get() {
            Some(0) => Err(ServiceError::Unavailable("call budget exhausted".into())),
            Some(left) => {
                self.call_budget.set(Some(left - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn stationary_at(&self, location: GridLocation) -> Option<&Unit> {
        self.units
            .get(&location)
            .and_then(|units| units.iter().find(|u| u.kind.is_stationary()))
    }

    fn can_place_friendly(&self, location: GridLocation) -> bool {
        self.arena().in_friendly_half(location) && !self.units.contains_key(&location)
    }

    fn push_unit(&mut self, location: GridLocation, kind: UnitKind, owner: Side, upgraded: bool) {
        let stats = self.match_config.stats(kind);
        let health = match (&stats.upgrade, upgraded) {
            (Some(up), true) => up.health.unwrap_or(stats.health),
            _ => stats.health,
        };
        self.units.entry(location).or_default().push(Unit {
            kind,
            owner,
            health,
            upgraded,
        });
    }

    fn info(&self, unit: &Unit) -> UnitInfo {
        UnitInfo {
            kind: unit.kind,
            owner: unit.owner,
            damage: self.match_config.stats(unit.kind).damage_for(unit.upgraded),
            health: unit.health,
            upgraded: unit.upgraded,
        }
    }

    fn checkpoint(&mut self) {
        if self.checkpoint.is_none() {
            self.checkpoint = Some(Checkpoint {
                structure_points: self.structure_points,
                mobile_points: self.mobile_points,
                units: self.units.clone(),
            });
        }
    }

    fn place_stationary(&mut self, kind: StationaryKind, location: GridLocation) -> bool {
        let cost = self.match_config.stats(kind.into()).structure_cost;
        if !self.can_place_friendly(location) || self.structure_points < cost {
            return false;
        }
        self.structure_points -= cost;
        self.push_unit(location, kind.into(), Side::Friendly, false);
        true
    }

    fn spawn_mobile(&mut self, kind: MobileKind, location: GridLocation, count: u32) -> u32 {
        let arena = *self.arena();
        let on_own_edge = arena.edge_of(location).is_some_and(|edge| edge.is_friendly());
        if !on_own_edge || self.stationary_at(location).is_some() {
            return 0;
        }
        let cost = self.match_config.stats(kind.into()).mobile_cost;
        let affordable = if cost > 0.0 {
            (self.mobile_points / cost).floor().max(0.0) as u32
        } else {
            count
        };
        let spawned = count.min(affordable);
        self.mobile_points -= cost * f64::from(spawned);
        for _ in 0..spawned {
            self.push_unit(location, kind.into(), Side::Friendly, false);
        }
        spawned
    }

    fn upgrade_at(&mut self, location: GridLocation) -> bool {
        let Some(units) = self.units.get_mut(&location) else {
            return false;
        };
        let Some(unit) = units
            .iter_mut()
            .find(|u| u.owner == Side::Friendly && u.kind.is_stationary())
        else {
            return false;
        };
        if unit.upgraded {
            return false;
        }
        let Some(upgrade) = self.match_config.stats(unit.kind).upgrade.clone() else {
            return false;
        };
        if self.structure_points < upgrade.structure_cost {
            return false;
        }
        self.structure_points -= upgrade.structure_cost;
        unit.upgraded = true;
        if let Some(health) = upgrade.health {
            unit.health = health;
        }
        true
    }

    fn apply_turn_start(&mut self) {
        let turn = self.turn;
        let structures: Vec<_> = self.scenario.structures_for(turn).cloned().collect();
        for s in structures {
            if !self.place_enemy(s.unit, s.at, s.upgraded) {
                debug!(turn, at = %s.at, "scenario structure skipped");
            }
        }
        let mobiles: Vec<_> = self.scenario.mobiles_for(turn).cloned().collect();
        for m in mobiles {
            self.spawn_enemy_mobile(m.unit, m.at, m.count);
        }
    }

    fn play_action_phase(&mut self) {
        let turn = self.turn;
        let breaches: Vec<_> = self.scenario.breaches_for(turn).cloned().collect();
        if breaches.is_empty() {
            return;
        }

        let mut entries = Vec::with_capacity(breaches.len());
        for b in &breaches {
            self.health = (self.health - b.damage).max(0.0);
            let id = self.next_unit_id;
            self.next_unit_id += 1;
            entries.push(serde_json::json!([
                [b.at.x, b.at.y],
                b.damage,
                UnitKind::Scout.index(),
                id.to_string(),
                2
            ]));
        }
        let frame = serde_json::json!({
            "turnInfo": [1, turn, 0, 0],
            "events": { "breach": entries },
        });
        self.frames.push(frame.to_string());
    }
}

impl BoardView for Sandbox {
    fn turn_number(&self) -> u32 {
        self.turn
    }

    fn resource(&self, kind: ResourceKind) -> Result<f64, ServiceError> {
        self.check_available()?;
        Ok(match kind {
            ResourceKind::StructurePoints => self.structure_points,
            ResourceKind::MobilePoints => self.mobile_points,
        })
    }

    fn health(&self) -> Result<f64, ServiceError> {
        self.check_available()?;
        Ok(self.health)
    }

    fn contains_stationary_unit(&self, location: GridLocation) -> Result<bool, ServiceError> {
        self.check_available()?;
        Ok(self.stationary_at(location).is_some())
    }

    fn occupied_locations(&self) -> Result<Vec<GridLocation>, ServiceError> {
        self.check_available()?;
        Ok(self
            .units
            .iter()
            .filter(|(_, units)| !units.is_empty())
            .map(|(loc, _)| *loc)
            .collect())
    }

    fn units_at(&self, location: GridLocation) -> Result<Vec<UnitInfo>, ServiceError> {
        self.check_available()?;
        Ok(self
            .units
            .get(&location)
            .map(|units| units.iter().map(|u| self.info(u)).collect())
            .unwrap_or_default())
    }

    fn attackers(
        &self,
        location: GridLocation,
        target: Side,
    ) -> Result<Vec<UnitInfo>, ServiceError> {
        self.check_available()?;
        let attacker_side = target.opponent();
        let mut out = Vec::new();
        for (loc, units) in &self.units {
            for unit in units.iter().filter(|u| u.owner == attacker_side && u.kind.is_stationary()) {
                let stats = self.match_config.stats(unit.kind);
                if stats.damage_for(unit.upgraded) <= 0.0 {
                    continue;
                }
                if loc.distance(location) <= stats.range_for(unit.upgraded) {
                    out.push(self.info(unit));
                }
            }
        }
        Ok(out)
    }
}

impl PathView for Sandbox {
    fn find_path_to_edge(&self, start: GridLocation) -> Result<Vec<GridLocation>, ServiceError> {
        self.check_available()?;
        let path = self
            .pathfinder
            .find_path_to_edge(start, |loc| self.stationary_at(loc).is_some());
        Ok(path.unwrap_or_default())
    }
}

impl TurnSink for Sandbox {
    fn attempt_spawn(
        &mut self,
        unit: UnitKind,
        locations: &[GridLocation],
        count: u32,
    ) -> Result<u32, ServiceError> {
        self.check_available()?;
        self.checkpoint();

        let mut accepted = 0;
        for &location in locations {
            let placed = match (unit.as_stationary(), unit.as_mobile()) {
                (Some(kind), _) => u32::from(self.place_stationary(kind, location)),
                (None, Some(kind)) => self.spawn_mobile(kind, location, count),
                (None, None) => 0,
            };
            if placed == 0 {
                debug!(turn = self.turn, unit = unit.as_str(), at = %location, "spawn rejected");
                continue;
            }
            accepted += placed;
            self.queued.push(SandboxAction::Spawned {
                unit,
                location,
                count: placed,
            });
        }
        Ok(accepted)
    }

    fn attempt_upgrade(&mut self, locations: &[GridLocation]) -> Result<u32, ServiceError> {
        self.check_available()?;
        self.checkpoint();

        let mut accepted = 0;
        for &location in locations {
            if self.upgrade_at(location) {
                accepted += 1;
                self.queued.push(SandboxAction::Upgraded { location });
            } else {
                debug!(turn = self.turn, at = %location, "upgrade rejected");
            }
        }
        Ok(accepted)
    }

    fn submit_turn(&mut self) -> Result<(), ServiceError> {
        if let Some(reason) = &self.submit_failure {
            return Err(ServiceError::Unavailable(reason.clone()));
        }

        self.history.push(TurnRecord {
            turn: self.turn,
            actions: std::mem::take(&mut self.queued),
        });
        self.checkpoint = None;

        self.play_action_phase();

        // Mobile units of both sides leave the board during the action phase.
        for units in self.units.values_mut() {
            units.retain(|u| u.kind.is_stationary());
        }
        self.units.retain(|_, units| !units.is_empty());

        self.turn += 1;
        self.structure_points += self.config.structure_income;
        self.mobile_points =
            self.mobile_points * (1.0 - self.config.mobile_decay) + self.config.mobile_income;
        self.apply_turn_start();
        Ok(())
    }

    fn abandon_turn(&mut self) {
        if let Some(cp) = self.checkpoint.take() {
            self.structure_points = cp.structure_points;
            self.mobile_points = cp.mobile_points;
            self.units = cp.units;
        }
        self.queued.clear();
    }
}
