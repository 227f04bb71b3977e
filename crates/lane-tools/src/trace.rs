use std::cell::RefCell;
use std::rc::Rc;

use lane_core::{GridLocation, TurnPhase};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the engine did at one point of a turn.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum TraceKind {
    TurnStart,
    /// A phase that dispatched at least one request.
    Phase {
        phase: TurnPhase,
        requests: usize,
        accepted: u32,
    },
    Launch {
        attack: String,
        at: GridLocation,
        /// Set when the launch point came from the spawn selector.
        estimated_damage: Option<f64>,
    },
    /// Planning hit a service failure and an empty turn was submitted instead.
    Forfeit { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub turn: u32,
    pub kind: TraceKind,
}

impl TraceEvent {
    pub fn new(turn: u32, kind: TraceKind) -> Self {
        Self { turn, kind }
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Share a sink between the engine and whoever reads it afterwards.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn emit(&mut self, event: TraceEvent) {
        self.borrow_mut().emit(event);
    }
}

/// In-memory trace of a match, oldest first.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn for_turn(&self, turn: u32) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.turn == turn)
    }

    pub fn turns_started(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == TraceKind::TurnStart)
            .count()
    }

    /// Launch points in the order attacks were sent.
    pub fn launches(&self) -> impl Iterator<Item = (u32, GridLocation)> + '_ {
        self.events.iter().filter_map(|e| match e.kind {
            TraceKind::Launch { at, .. } => Some((e.turn, at)),
            _ => None,
        })
    }

    /// Units accepted per phase, summed over the whole log.
    pub fn accepted_in(&self, phase: TurnPhase) -> u32 {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                TraceKind::Phase {
                    phase: p, accepted, ..
                } if p == phase => Some(accepted),
                _ => None,
            })
            .sum()
    }

    pub fn forfeits(&self) -> impl Iterator<Item = u32> + '_ {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Forfeit { .. }))
            .map(|e| e.turn)
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Emit into an optional sink; a missing sink drops the event.
pub fn emit(sink: &mut Option<Box<dyn TraceSink>>, event: TraceEvent) {
    if let Some(sink) = sink.as_mut() {
        sink.emit(event);
    }
}
