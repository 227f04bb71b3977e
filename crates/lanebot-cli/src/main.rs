//! lanebot - offline runner for the lane-combat decision engine

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lane_policy::PolicyProfile;
use lanebot::{simulate, BotConfig, SimulationSummary};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "lanebot")]
#[command(about = "Plan and replay lane-combat turns offline", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the engine against the sandbox
    Simulate {
        /// Built-in profile preset
        #[arg(long)]
        profile: Option<String>,

        /// Profile YAML; overrides --profile
        #[arg(long)]
        profile_file: Option<PathBuf>,

        /// Number of turns to play
        #[arg(short, long)]
        turns: Option<u32>,

        /// Scripted opponent YAML
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Match-start config JSON
        #[arg(long)]
        game_config: Option<PathBuf>,

        /// Write the decision trace as JSON
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect policy profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Initialize lanebot in a project
    Init,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List built-in presets
    List,

    /// Print a preset as YAML
    Show { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let project_root = match cli.project {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Some(Commands::Simulate {
            profile,
            profile_file,
            turns,
            scenario,
            game_config,
            trace,
            json,
        }) => {
            let mut config = BotConfig::load_from_project(&project_root)?;
            config.resolve_paths(&project_root);
            if let Some(profile) = profile {
                config.profile = profile;
                config.profile_file = None;
            }
            if profile_file.is_some() {
                config.profile_file = profile_file;
            }
            if let Some(turns) = turns {
                config.turns = turns;
            }
            if scenario.is_some() {
                config.scenario = scenario;
            }
            if game_config.is_some() {
                config.game_config = game_config;
            }

            let summary = simulate(&config)?;
            if let Some(path) = trace {
                write_trace(&path, &summary)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Some(Commands::Profile { command }) => match command {
            ProfileCommands::List => {
                for name in PolicyProfile::PRESETS {
                    println!("{name}");
                }
            }
            ProfileCommands::Show { name } => {
                let profile = PolicyProfile::preset(&name)?;
                print!("{}", profile.to_yaml_string()?);
            }
        },
        Some(Commands::Init) => {
            init_project(&project_root)?;
        }
        None => {
            println!("lanebot - offline runner for the lane-combat decision engine");
            println!();
            println!("Usage: lanebot <COMMAND>");
            println!();
            println!("Commands:");
            println!("  simulate  Play the engine against the sandbox");
            println!("  profile   Inspect policy profiles");
            println!("  init      Initialize lanebot in a project");
            println!();
            println!("Run 'lanebot --help' for more information.");
        }
    }

    Ok(())
}

fn init_project(project_root: &Path) -> Result<()> {
    match BotConfig::write_default(project_root)? {
        Some(path) => {
            println!("Initialized lanebot in {}", project_root.display());
            println!("  Created: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Pick a profile in .lanebot/config.yaml");
            println!("  2. Run: lanebot simulate");
        }
        None => {
            println!("lanebot already initialized in {}", project_root.display());
        }
    }
    Ok(())
}

fn write_trace(path: &Path, summary: &SimulationSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(&summary.trace)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write trace to {}", path.display()))
}

fn print_summary(summary: &SimulationSummary) {
    println!("Profile: {}", summary.profile);
    println!();
    for line in &summary.turns {
        if line.forfeited {
            println!("  turn {:>3}  forfeited  health {:>5.1}", line.turn, line.health);
            continue;
        }
        let attack = match (&line.attack, line.launch) {
            (Some(name), Some(at)) => format!("{name} @ {at}"),
            _ => "-".to_string(),
        };
        println!(
            "  turn {:>3}  {:>3} units from {:>3} requests  attack {:<24} health {:>5.1}",
            line.turn, line.accepted, line.requests, attack, line.health
        );
        for name in line.contingencies.iter().chain(&line.economy) {
            println!("              + {name}");
        }
    }
    println!();
    println!("Breaches: {}", summary.breaches.len());
    println!("Final health: {:.1}", summary.final_health);
}
