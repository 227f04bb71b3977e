//! Offline stand-in for the match server.
//!
//! [`Sandbox`] keeps a board in memory, charges costs, enforces occupancy and half/edge rules, and
//! answers pathing and attacker queries. It does not simulate combat: mobile units are removed
//! when the turn is submitted and breaches only happen when a [`Scenario`] scripts them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod sandbox;
pub mod scenario;

pub use sandbox::{Sandbox, SandboxAction, SandboxConfig, TurnRecord};
pub use scenario::{Scenario, ScenarioBreach, ScenarioError, ScenarioMobile, ScenarioStructure};
