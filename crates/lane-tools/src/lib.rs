//! Decision trace for the lane-combat engine.
//!
//! The engine reports turn starts, per-phase request counts, attack launches and forfeits as
//! typed events. Sinks decide whether to keep them; [`TraceLog`] keeps them in memory and can be
//! shared with the engine through `Rc<RefCell<_>>`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{emit, TraceEvent, TraceKind, TraceLog, TraceSink};
