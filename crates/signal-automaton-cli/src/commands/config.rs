//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::Result;

use crate::config::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Signal Automaton CLI Configuration");
    println!("{:-<40}", "");

    println!("Cells:         {}", config.diagram.cells);
    println!("Steps:         {}", config.diagram.steps);
    println!(
        "Start Signal:  {}",
        config.diagram.start_signal.as_deref().unwrap_or("(none)")
    );

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "cells" => {
            config.diagram.cells = value.parse()?;
            println!("Set cells to: {}", value);
        }
        "steps" => {
            config.diagram.steps = value.parse()?;
            println!("Set steps to: {}", value);
        }
        "start-signal" | "start" => {
            config.diagram.start_signal = match value {
                "" | "none" => None,
                name => Some(name.to_string()),
            };
            println!("Set start-signal to: {}", value);
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {}. Valid keys: cells, steps, start-signal",
                key
            );
        }
    }

    config.diagram.validate()?;
    config.save()?;
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
