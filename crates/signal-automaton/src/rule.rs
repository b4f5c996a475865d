//! Rules: a condition paired with the signal placements it triggers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::clause::Clause;
use crate::signal::{Signal, SignalTable};

/// One signal placement.
///
/// When the owning rule fires at cell `c`, time `t`, `signal` is added to cell
/// `c + neighbor_offset` at time `t + future_step`. A zero `future_step` is
/// only valid with a zero `neighbor_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleOutput {
    pub neighbor_offset: i32,
    pub signal: Signal,
    pub future_step: u32,
}

impl RuleOutput {
    /// Create a new output.
    pub fn new(neighbor_offset: i32, signal: Signal, future_step: u32) -> Self {
        Self {
            neighbor_offset,
            signal,
            future_step,
        }
    }

    /// Check if this output writes into the step being computed.
    pub fn is_same_step(&self) -> bool {
        self.future_step == 0
    }

    /// Canonical `step/offset.name` form.
    pub fn render(&self, signals: &SignalTable) -> String {
        format!(
            "{}/{}.{}",
            self.future_step,
            self.neighbor_offset,
            signals.get(self.signal).unwrap_or("?")
        )
    }
}

/// A condition and the ordered outputs it produces when satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub condition: Clause,
    pub outputs: Vec<RuleOutput>,
}

impl Rule {
    /// Create a new rule.
    pub fn new(condition: Clause, outputs: Vec<RuleOutput>) -> Self {
        Self {
            condition,
            outputs,
        }
    }

    /// Signals referenced by the condition or produced by the outputs.
    pub fn signals(&self) -> BTreeSet<Signal> {
        let mut out = self.condition.signals();
        out.extend(self.outputs.iter().map(|o| o.signal));
        out
    }

    /// Canonical `condition: outputs` line.
    pub fn render(&self, signals: &SignalTable) -> String {
        let outputs = self
            .outputs
            .iter()
            .map(|o| o.render(signals))
            .collect::<Vec<_>>()
            .join(" ");
        let condition = self.condition.render(signals);
        if condition.is_empty() {
            format!(": {outputs}")
        } else {
            format!("{condition}: {outputs}")
        }
    }
}
