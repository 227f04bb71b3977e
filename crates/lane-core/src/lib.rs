//! Value types and service seams for the lane-combat decision engine.
//!
//! Everything the engine knows about the match flows through the traits in [`world`]; the crate
//! itself never talks to a server.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod location;
pub mod request;
pub mod resource;
pub mod unit;
pub mod world;

pub use config::{MatchConfig, UnitStats, UpgradeStats};
pub use error::{ConfigError, ServiceError};
pub use location::GridLocation;
pub use request::{BuildRequest, TurnPhase};
pub use resource::ResourceKind;
pub use unit::{MobileKind, Side, StationaryKind, UnitInfo, UnitKind};
pub use world::{BoardView, GameService, PathView, TurnSink};
