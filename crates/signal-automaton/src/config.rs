//! Simulation settings.

use serde::{Deserialize, Serialize};

use crate::error::{AutomatonError, AutomatonResult};

/// Size of the strip, number of steps to simulate, and the optional signal
/// placed in cell 0 before the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Number of cells in the strip.
    #[serde(default = "default_cells")]
    pub cells: usize,

    /// Number of steps to compute after the initial configuration.
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Signal seeded into cell 0, if any.
    #[serde(default = "default_start_signal")]
    pub start_signal: Option<String>,
}

fn default_cells() -> usize {
    40
}

fn default_steps() -> usize {
    40
}

fn default_start_signal() -> Option<String> {
    Some("Init".to_string())
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            cells: default_cells(),
            steps: default_steps(),
            start_signal: default_start_signal(),
        }
    }
}

impl DiagramConfig {
    /// A small strip for quick checks.
    pub fn fast() -> Self {
        Self {
            cells: 10,
            steps: 10,
            ..Default::default()
        }
    }

    /// A wide strip with a long horizon.
    pub fn thorough() -> Self {
        Self {
            cells: 200,
            steps: 400,
            ..Default::default()
        }
    }

    /// Reject settings that cannot describe a strip.
    pub fn validate(&self) -> AutomatonResult<()> {
        if self.cells == 0 {
            return Err(AutomatonError::InvalidConfig {
                message: "a configuration needs at least one cell".to_string(),
            });
        }
        if matches!(&self.start_signal, Some(name) if name.trim().is_empty()) {
            return Err(AutomatonError::InvalidConfig {
                message: "start signal name is empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiagramConfig::default();
        assert_eq!(config.cells, 40);
        assert_eq!(config.steps, 40);
        assert_eq!(config.start_signal.as_deref(), Some("Init"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: DiagramConfig = serde_json::from_str(r#"{"cells": 12}"#).unwrap();
        assert_eq!(config.cells, 12);
        assert_eq!(config.steps, 40);
        assert_eq!(config.start_signal.as_deref(), Some("Init"));

        let config: DiagramConfig = serde_json::from_str(r#"{"start_signal": null}"#).unwrap();
        assert_eq!(config.start_signal, None);
    }

    #[test]
    fn test_validate() {
        assert!(DiagramConfig { cells: 0, ..DiagramConfig::fast() }.validate().is_err());
        let blank = DiagramConfig {
            start_signal: Some("  ".to_string()),
            ..DiagramConfig::thorough()
        };
        assert!(blank.validate().is_err());
    }
}
