//! CLI configuration management.
//!
//! Supports loading configuration from environment variables, a config file,
//! and CLI arguments with proper precedence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use signal_automaton::DiagramConfig;

/// Overrides the config file location.
pub const CONFIG_FILE_ENV: &str = "SCA_CONFIG_FILE";

/// Application-wide configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default strip size, horizon, and start signal for `sca run`.
    #[serde(flatten)]
    pub diagram: DiagramConfig,
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        // File config takes lower precedence than env vars
        let mut config = Self::load_file()?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load only what the config file holds, without environment overrides.
    ///
    /// This is the value `config set` edits and saves back.
    pub fn load_file() -> Result<Self> {
        let Some(config_path) = Self::config_file_path() else {
            return Ok(Self::default());
        };
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        serde_json::from_str(&contents).with_context(|| "Failed to parse config file")
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(cells) = std::env::var("SCA_CELLS") {
            self.diagram.cells = cells
                .parse()
                .with_context(|| format!("SCA_CELLS is not a number: {cells}"))?;
        }
        if let Ok(steps) = std::env::var("SCA_STEPS") {
            self.diagram.steps = steps
                .parse()
                .with_context(|| format!("SCA_STEPS is not a number: {steps}"))?;
        }
        if let Ok(start) = std::env::var("SCA_START_SIGNAL") {
            self.diagram.start_signal = if start.is_empty() { None } else { Some(start) };
        }
        Ok(())
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("dev", "signal-automaton", "sca")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
