//! CLI command implementations.

pub mod check;
pub mod config;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use signal_automaton::Automaton;
use tracing::debug;

/// Read and parse a rule file.
fn load_automaton(path: &Path) -> Result<Automaton> {
    let automaton = Automaton::from_file(path)
        .with_context(|| format!("Failed to load rules from {}", path.display()))?;
    debug!(path = %path.display(), rules = automaton.rules().len(), "rules_loaded");
    Ok(automaton)
}
