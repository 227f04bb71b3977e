//! Offline tooling around the decision engine: project configuration and sandbox runs.

#![forbid(unsafe_code)]

pub mod config;
pub mod simulate;

pub use config::BotConfig;
pub use simulate::{simulate, SimulationSummary, TurnLine};
