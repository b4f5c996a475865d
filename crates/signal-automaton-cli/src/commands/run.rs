//! `sca run`: simulate a rule file and print its space-time diagram.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use signal_automaton::{Automaton, DiagramConfig};
use tracing::info;

/// Output format for diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown format: {}. Use 'text' or 'json'", s),
        }
    }
}

/// Execute the `sca run` command.
pub fn execute(
    rules: &Path,
    diagram_config: &DiagramConfig,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut automaton = super::load_automaton(rules)?;

    info!(
        rules = automaton.rules().len(),
        cells = diagram_config.cells,
        steps = diagram_config.steps,
        "Running automaton"
    );

    let diagram = automaton
        .run(diagram_config)
        .with_context(|| format!("Failed to simulate {}", rules.display()))?;

    let rendered = render(&automaton, &diagram, format)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write diagram to {}", path.display()))?;
            println!("Wrote {} steps to {}", diagram.len(), path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn render(
    automaton: &Automaton,
    diagram: &signal_automaton::Diagram,
    format: OutputFormat,
) -> Result<String> {
    let signals = automaton.signal_table();
    Ok(match format {
        OutputFormat::Text => diagram.render_text(signals),
        OutputFormat::Json => {
            let mut json = diagram.to_named(signals).to_json()?;
            json.push('\n');
            json
        }
    })
}
