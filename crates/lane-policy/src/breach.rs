//! Breach events from action frames, and the per-match breach history.

use std::collections::BTreeSet;

use lane_core::{GridLocation, Side};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Owner index the match server uses for the agent.
const AGENT_OWNER: i64 = 1;

/// A unit crossing onto an edge tile, reported between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachEvent {
    pub location: GridLocation,
    pub turn: u32,
    /// Owner of the unit that crossed.
    pub crossing_owner: Side,
}

impl BreachEvent {
    /// Extract breach events from one action frame.
    ///
    /// The frame's turn is `turnInfo[1]`; each `events.breach` entry is
    /// `[[x, y], damage, unit_type, unit_id, owner]`. Entries without a usable location or owner
    /// are dropped with a warning, as is a frame without a turn.
    pub fn parse_frame(frame: &str) -> Vec<BreachEvent> {
        let value: Value = match serde_json::from_str(frame) {
            Ok(v) => v,
            Err(err) => {
                warn!(error = %err, "dropping unparseable action frame");
                return Vec::new();
            }
        };
        Self::from_frame(&value)
    }

    pub fn from_frame(frame: &Value) -> Vec<BreachEvent> {
        let Some(breaches) = frame.pointer("/events/breach").and_then(Value::as_array) else {
            return Vec::new();
        };
        if breaches.is_empty() {
            return Vec::new();
        }
        let Some(turn) = frame
            .pointer("/turnInfo/1")
            .and_then(Value::as_u64)
            .and_then(|t| u32::try_from(t).ok())
        else {
            warn!(count = breaches.len(), "action frame has breaches but no turn; dropping");
            return Vec::new();
        };

        breaches
            .iter()
            .filter_map(|entry| {
                let event = parse_entry(entry, turn);
                if event.is_none() {
                    warn!(turn, entry = %entry, "dropping malformed breach entry");
                }
                event
            })
            .collect()
    }
}

fn parse_entry(entry: &Value, turn: u32) -> Option<BreachEvent> {
    let fields = entry.as_array()?;
    let xy = fields.first()?.as_array()?;
    if xy.len() != 2 {
        return None;
    }
    let x = i32::try_from(xy[0].as_i64()?).ok()?;
    let y = i32::try_from(xy[1].as_i64()?).ok()?;
    let owner = fields.get(4)?.as_i64()?;
    let crossing_owner = if owner == AGENT_OWNER {
        Side::Friendly
    } else {
        Side::Enemy
    };
    Some(BreachEvent {
        location: GridLocation::new(x, y),
        turn,
        crossing_owner,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreachEntry {
    pub location: GridLocation,
    pub turn: u32,
}

/// Every location where the opponent got through, in the order first reported.
///
/// Append-only for the lifetime of the match. Recording the same `(location, turn)` twice is a
/// no-op, so frames can be replayed safely.
#[derive(Debug, Clone, Default)]
pub struct BreachLedger {
    entries: Vec<BreachEntry>,
    seen: BTreeSet<BreachEntry>,
}

impl BreachLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the event added an entry.
    pub fn record(&mut self, event: BreachEvent) -> bool {
        if event.crossing_owner == Side::Friendly {
            return false;
        }
        let entry = BreachEntry {
            location: event.location,
            turn: event.turn,
        };
        if !self.seen.insert(entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Record every event, returning how many were new.
    pub fn ingest(&mut self, events: impl IntoIterator<Item = BreachEvent>) -> usize {
        events.into_iter().filter(|e| self.record(*e)).count()
    }

    pub fn entries(&self) -> &[BreachEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct breached locations, first-seen order.
    pub fn locations(&self) -> Vec<GridLocation> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .map(|e| e.location)
            .filter(|loc| seen.insert(*loc))
            .collect()
    }
}
