//! Space-time diagrams: the ordered configurations produced by a simulation.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;
use crate::error::AutomatonResult;
use crate::signal::SignalTable;

/// Configurations indexed by time step; index 0 is the initial configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    configurations: Vec<Configuration>,
}

impl Diagram {
    /// Wrap an existing sequence of configurations.
    pub fn from_configurations(configurations: Vec<Configuration>) -> Self {
        Self { configurations }
    }

    /// Number of time steps, including the initial one.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Check if the diagram holds no configuration.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Number of cells per configuration.
    pub fn width(&self) -> usize {
        self.configurations.first().map_or(0, Configuration::len)
    }

    /// The configuration at time `t`.
    pub fn get(&self, t: usize) -> Option<&Configuration> {
        self.configurations.get(t)
    }

    /// Iterate over configurations in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Configuration> {
        self.configurations.iter()
    }

    pub(crate) fn configurations_mut(&mut self) -> &mut [Configuration] {
        &mut self.configurations
    }

    /// Take ownership of the configurations.
    pub fn into_configurations(self) -> Vec<Configuration> {
        self.configurations
    }

    /// Resolve every signal handle to its name.
    pub fn to_named(&self, signals: &SignalTable) -> NamedDiagram {
        let steps = self
            .configurations
            .iter()
            .map(|config| {
                config
                    .cells()
                    .iter()
                    .map(|cell| {
                        let mut names: Vec<String> = cell
                            .iter()
                            .map(|s| signals.get(*s).unwrap_or("?").to_string())
                            .collect();
                        names.sort();
                        names
                    })
                    .collect()
            })
            .collect();

        NamedDiagram {
            width: self.width(),
            steps,
        }
    }

    /// Plain-text dump: one row per time step, `.` for empty cells.
    pub fn render_text(&self, signals: &SignalTable) -> String {
        let named = self.to_named(signals);
        let rows: Vec<Vec<String>> = named
            .steps
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .map(|names| {
                        if names.is_empty() {
                            ".".to_string()
                        } else {
                            names.join(",")
                        }
                    })
                    .collect()
            })
            .collect();

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![1; columns];
        for row in &rows {
            for (col, text) in row.iter().enumerate() {
                widths[col] = widths[col].max(text.chars().count());
            }
        }
        let label_width = rows.len().saturating_sub(1).to_string().len();

        let mut out = String::new();
        for (t, row) in rows.iter().enumerate() {
            let cells = row
                .iter()
                .zip(&widths)
                .map(|(text, &width)| format!("{text:<width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(format!("{t:>label_width$} | {cells}").trim_end());
            out.push('\n');
        }
        out
    }
}

impl Index<usize> for Diagram {
    type Output = Configuration;

    fn index(&self, t: usize) -> &Configuration {
        &self.configurations[t]
    }
}

impl<'a> IntoIterator for &'a Diagram {
    type Item = &'a Configuration;
    type IntoIter = std::slice::Iter<'a, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.configurations.iter()
    }
}

/// A diagram with signal names resolved, for export to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDiagram {
    /// Number of cells per step.
    pub width: usize,
    /// `steps[t][cell]` lists the sorted names of the active signals.
    pub steps: Vec<Vec<Vec<String>>>,
}

impl NamedDiagram {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> AutomatonResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
