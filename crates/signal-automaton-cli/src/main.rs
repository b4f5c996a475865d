//! Signal Automaton CLI - parse rule files and print space-time diagrams.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;
mod config;

use commands::run::OutputFormat;
use config::Config;

/// Signal Automaton CLI - simulate one-dimensional signal cellular automata.
///
/// Run `sca run rules.sca` to print the diagram of a rule file.
#[derive(Parser, Debug)]
#[command(
    name = "sca",
    author,
    version,
    about = "Signal Automaton: parse rule files and print space-time diagrams",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a rule file and print the diagram.
    ///
    /// Cell 0 of the initial configuration is seeded with the start signal
    /// unless `--no-start` is given.
    Run {
        /// Path to the rule file.
        rules: PathBuf,

        /// Number of cells in the strip.
        #[arg(short, long)]
        cells: Option<usize>,

        /// Number of steps to simulate.
        #[arg(short, long)]
        steps: Option<usize>,

        /// Signal placed in cell 0 before the first step.
        #[arg(long, conflicts_with = "no_start")]
        start: Option<String>,

        /// Start from an all-empty configuration.
        #[arg(long)]
        no_start: bool,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the diagram to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a rule file and print its canonical form and bounds.
    Check {
        /// Path to the rule file.
        rules: PathBuf,
    },

    /// List the signals a rule file references.
    Signals {
        /// Path to the rule file.
        rules: PathBuf,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration management commands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key (cells, steps, start-signal).
        key: String,

        /// Value to set.
        value: String,
    },

    /// Reset configuration to defaults.
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Run {
            rules,
            cells,
            steps,
            start,
            no_start,
            format,
            output,
        } => {
            // CLI flags take precedence over env vars and the config file
            let mut diagram_config = config.diagram;
            if let Some(cells) = cells {
                diagram_config.cells = cells;
            }
            if let Some(steps) = steps {
                diagram_config.steps = steps;
            }
            if start.is_some() {
                diagram_config.start_signal = start;
            }
            if no_start {
                diagram_config.start_signal = None;
            }

            let format: OutputFormat = format.parse()?;
            commands::run::execute(&rules, &diagram_config, format, output)?;
        }

        Commands::Check { rules } => commands::check::execute(&rules)?,

        Commands::Signals { rules } => commands::check::signals(&rules)?,

        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => commands::config::show(&config)?,
            ConfigCommands::Set { key, value } => {
                // Edit the file's own values so env overrides are not persisted
                let mut stored = Config::load_file()?;
                commands::config::set(&mut stored, &key, &value)?;
            }
            ConfigCommands::Reset => commands::config::reset()?,
        },
    }

    Ok(())
}
