//! Project configuration, loaded from `.lanebot/config.yaml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lane_core::MatchConfig;
use lane_policy::PolicyProfile;
use lane_sim::SandboxConfig;
use serde::{Deserialize, Serialize};

pub const CONFIG_DIR: &str = ".lanebot";
pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Built-in profile preset, used when `profile_file` is unset.
    pub profile: String,

    /// Profile YAML (relative to project root)
    pub profile_file: Option<PathBuf>,

    /// Match-start config JSON with `unitInformation`; the standard unit table when unset.
    pub game_config: Option<PathBuf>,

    /// Scripted opponent for offline runs
    pub scenario: Option<PathBuf>,

    /// Turns to play in `lanebot simulate`
    pub turns: u32,

    pub sandbox: SandboxConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            profile: "standard".to_string(),
            profile_file: None,
            game_config: None,
            scenario: None,
            turns: 10,
            sandbox: SandboxConfig::default(),
        }
    }
}

impl BotConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load from project root (looks for .lanebot/config.yaml)
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve paths relative to project root
    pub fn resolve_paths(&mut self, project_root: &Path) {
        for path in [&mut self.profile_file, &mut self.game_config, &mut self.scenario]
            .into_iter()
            .flatten()
        {
            *path = project_root.join(&*path);
        }
    }

    pub fn policy_profile(&self) -> Result<PolicyProfile> {
        match &self.profile_file {
            Some(path) => PolicyProfile::load(path)
                .with_context(|| format!("Failed to load profile from {}", path.display())),
            None => Ok(PolicyProfile::preset(&self.profile)?),
        }
    }

    pub fn match_config(&self) -> Result<MatchConfig> {
        let Some(path) = &self.game_config else {
            return Ok(MatchConfig::standard());
        };
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game config from {}", path.display()))?;
        MatchConfig::from_game_config_json(&document)
            .with_context(|| format!("Invalid game config in {}", path.display()))
    }

    /// Write a default config unless one exists. Returns the path written.
    pub fn write_default(project_root: &Path) -> Result<Option<PathBuf>> {
        let dir = project_root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Ok(None);
        }
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(Some(config_path))
    }
}

const DEFAULT_CONFIG: &str = r#"# lanebot configuration

# Built-in preset: standard, aggressive or dynamic
profile: standard
# profile_file: profiles/custom.yaml

# game_config: game-configs.json
# scenario: scenarios/turret-wall.yaml

turns: 10

sandbox:
  arena_size: 28
  starting_structure_points: 40
  structure_income: 5
  starting_mobile_points: 5
  mobile_income: 5
  mobile_decay: 0.25
  starting_health: 30
"#;
