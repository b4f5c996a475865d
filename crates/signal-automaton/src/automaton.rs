//! Parsed automata and diagram generation.
//!
//! An [`Automaton`] owns its rules, the signal table they were parsed with,
//! and the bounds derived from them. [`Automaton::make_diagram`] runs the
//! rules over an initial configuration and returns the full space-time
//! diagram.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::config::DiagramConfig;
use crate::configuration::Configuration;
use crate::diagram::Diagram;
use crate::error::AutomatonResult;
use crate::parser::parse_rules;
use crate::rule::Rule;
use crate::signal::{Signal, SignalTable};

/// Parse rule text into an automaton.
pub fn parse_automaton(text: &str) -> AutomatonResult<Automaton> {
    Automaton::parse(text)
}

/// An ordered rule set with its derived neighborhood and lookahead bounds.
#[derive(Debug, Clone)]
pub struct Automaton {
    signals: SignalTable,
    rules: Vec<Rule>,
    min_neighbor: i32,
    max_neighbor: i32,
    max_future_depth: u32,
}

impl Automaton {
    /// Parse rule text. Fails on the first syntax error.
    pub fn parse(text: &str) -> AutomatonResult<Self> {
        let mut signals = SignalTable::new();
        let parsed = parse_rules(text, &mut signals)?;
        let automaton = Self::from_rules(signals, parsed.rules);

        debug!(
            rules = automaton.rules.len(),
            signals = automaton.signals.len(),
            min_neighbor = automaton.min_neighbor,
            max_neighbor = automaton.max_neighbor,
            max_future_depth = automaton.max_future_depth,
            "automaton_parsed"
        );

        Ok(automaton)
    }

    /// Read and parse a rule file.
    pub fn from_file(path: impl AsRef<Path>) -> AutomatonResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Build from already-constructed rules whose signals live in `signals`.
    ///
    /// Bounds are derived from every literal position and output offset,
    /// always including 0.
    pub fn from_rules(signals: SignalTable, rules: Vec<Rule>) -> Self {
        let mut min_neighbor: i32 = 0;
        let mut max_neighbor: i32 = 0;
        let mut max_future_depth: u32 = 0;

        for rule in &rules {
            rule.condition.visit_literals(&mut |_, position, _| {
                min_neighbor = min_neighbor.min(position);
                max_neighbor = max_neighbor.max(position);
            });
            for output in &rule.outputs {
                min_neighbor = min_neighbor.min(output.neighbor_offset);
                max_neighbor = max_neighbor.max(output.neighbor_offset);
                max_future_depth = max_future_depth.max(output.future_step);
            }
        }

        Self {
            signals,
            rules,
            min_neighbor,
            max_neighbor,
            max_future_depth,
        }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Smallest relative offset any rule reads or writes.
    pub fn min_neighbor(&self) -> i32 {
        self.min_neighbor
    }

    /// Largest relative offset any rule reads or writes.
    pub fn max_neighbor(&self) -> i32 {
        self.max_neighbor
    }

    /// Largest future step of any output.
    pub fn max_future_depth(&self) -> u32 {
        self.max_future_depth
    }

    /// The table the rules were interned into.
    pub fn signal_table(&self) -> &SignalTable {
        &self.signals
    }

    /// Look up a signal by name.
    pub fn signal(&self, name: &str) -> Option<Signal> {
        self.signals.lookup(name)
    }

    /// Intern a signal, e.g. a start signal no rule mentions.
    pub fn intern(&mut self, name: &str) -> Signal {
        self.signals.intern(name)
    }

    /// Name of a signal handle.
    pub fn signal_name(&self, signal: Signal) -> Option<&str> {
        self.signals.get(signal)
    }

    /// Every signal referenced by a condition or produced by an output.
    pub fn signals(&self) -> BTreeSet<Signal> {
        self.rules.iter().flat_map(Rule::signals).collect()
    }

    /// Canonical text of every rule, one per line, in declaration order.
    pub fn render(&self) -> String {
        self.rules
            .iter()
            .map(|rule| rule.render(&self.signals))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Simulate `nb_steps` steps from `initial`.
    ///
    /// Cells are scanned left to right and rules applied in declaration
    /// order, each against the live configuration of the current step. A
    /// same-step write made at cell `c` is therefore visible to later rules
    /// at `c` and to every cell scanned after `c`. Writes landing outside the
    /// strip or past the last step are dropped.
    pub fn make_diagram(&self, initial: Configuration, nb_steps: usize) -> AutomatonResult<Diagram> {
        let width = initial.len();
        let mut configurations = Vec::with_capacity(nb_steps + 1);
        configurations.push(initial);
        configurations.extend((0..nb_steps).map(|_| Configuration::new(width)));
        let mut diagram = Diagram::from_configurations(configurations);

        debug!(cells = width, steps = nb_steps, rules = self.rules.len(), "diagram_start");

        let mut writes = 0usize;
        let mut dropped = 0usize;
        let steps = diagram.configurations_mut();

        for t in 0..nb_steps {
            for c in 0..width {
                for rule in &self.rules {
                    let fires = {
                        let neighborhood = steps[t].neighborhood(c, self.min_neighbor, self.max_neighbor);
                        rule.condition.eval(&neighborhood)?
                    };
                    if !fires {
                        continue;
                    }

                    for output in &rule.outputs {
                        let target_time = t + output.future_step as usize;
                        let target_cell = c as i64 + i64::from(output.neighbor_offset);
                        let slot = usize::try_from(target_cell)
                            .ok()
                            .and_then(|cell| steps.get_mut(target_time)?.cell_mut(cell));

                        match slot {
                            Some(cell) => {
                                cell.insert(output.signal);
                                writes += 1;
                            }
                            None => {
                                trace!(cell = target_cell, time = target_time, "write_dropped");
                                dropped += 1;
                            }
                        }
                    }
                }
            }
        }

        debug!(writes, dropped, "diagram_complete");

        Ok(diagram)
    }

    /// Build the initial configuration described by `config` and simulate it.
    ///
    /// When `config.start_signal` is set, cell 0 is seeded with it.
    pub fn run(&mut self, config: &DiagramConfig) -> AutomatonResult<Diagram> {
        config.validate()?;

        let mut initial = Configuration::new(config.cells);
        if let Some(name) = &config.start_signal {
            let start = self.intern(name);
            initial.insert(0, start)?;
        }

        self.make_diagram(initial, config.steps)
    }
}

impl FromStr for Automaton {
    type Err = crate::error::AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
