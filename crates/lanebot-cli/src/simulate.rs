//! Play the decision engine against the sandbox for a fixed number of turns.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use lane_core::{BoardView, GridLocation};
use lane_policy::{DecisionEngine, TurnOutcome};
use lane_sim::{Sandbox, Scenario};
use lane_tools::TraceLog;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BotConfig;

/// One row of the per-turn summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnLine {
    pub turn: u32,
    pub forfeited: bool,
    pub requests: usize,
    pub accepted: u32,
    pub attack: Option<String>,
    pub launch: Option<GridLocation>,
    pub contingencies: Vec<String>,
    pub economy: Vec<String>,
    pub health: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub profile: String,
    pub turns: Vec<TurnLine>,
    pub breaches: Vec<GridLocation>,
    pub final_health: f64,
    pub trace: TraceLog,
}

pub fn simulate(config: &BotConfig) -> Result<SimulationSummary> {
    let match_config = config.match_config()?;
    let profile = config.policy_profile()?;
    let scenario = match &config.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))?,
        None => Scenario::default(),
    };

    let trace = Rc::new(RefCell::new(TraceLog::default()));
    let profile_name = profile.name.clone();
    let mut sandbox = Sandbox::with_config(match_config.clone(), config.sandbox.clone())
        .with_scenario(scenario);
    let mut engine =
        DecisionEngine::new(match_config, profile).with_trace_sink(Box::new(trace.clone()));

    info!(profile = %profile_name, turns = config.turns, "starting simulation");

    let mut turns = Vec::with_capacity(config.turns as usize);
    for _ in 0..config.turns {
        for frame in sandbox.drain_action_frames() {
            let added = engine.on_action_frame(&frame);
            debug!(added, "action frame ingested");
        }

        let outcome = engine.take_turn(&mut sandbox)?;
        let health = sandbox.health()?;
        turns.push(match outcome {
            TurnOutcome::Submitted(report) => TurnLine {
                turn: report.turn,
                forfeited: false,
                requests: report.requests.len(),
                accepted: report.requests.iter().map(|r| r.accepted).sum(),
                attack: report.attack.as_ref().map(|a| a.name.clone()),
                launch: report.attack.as_ref().map(|a| a.launch),
                contingencies: report.contingencies,
                economy: report.economy,
                health,
            },
            TurnOutcome::Forfeited { turn, .. } => TurnLine {
                turn,
                forfeited: true,
                requests: 0,
                accepted: 0,
                attack: None,
                launch: None,
                contingencies: Vec::new(),
                economy: Vec::new(),
                health,
            },
        });

        if health <= 0.0 {
            info!(turn = sandbox.turn_number(), "agent destroyed; stopping early");
            break;
        }
    }

    // Breaches from the final submitted turn.
    for frame in sandbox.drain_action_frames() {
        engine.on_action_frame(&frame);
    }

    let breaches = engine.ledger().locations();
    let final_health = sandbox.health()?;
    let trace = trace.take();

    Ok(SimulationSummary {
        profile: profile_name,
        turns,
        breaches,
        final_health,
        trace,
    })
}
