//! Arena geometry and a reference edge pathfinder.
//!
//! The match server owns the real pathing rules; this crate provides a deterministic stand-in for
//! offline runs and tests.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod arena;
pub mod edge_path;

pub use arena::{Arena, Edge};
pub use edge_path::EdgePathfinder;
