//! Boolean conditions over signal presence in a neighborhood.
//!
//! A [`Clause`] is a closed tree of literals, negations, conjunctions and
//! disjunctions. Trees are normalized as they are built through the
//! constructor functions ([`Clause::negate`], [`Clause::all`],
//! [`Clause::any`]) and never change afterwards.

use std::collections::BTreeSet;

use crate::configuration::Neighborhood;
use crate::error::AutomatonResult;
use crate::signal::{Signal, SignalTable};

/// A boolean expression over a [`Neighborhood`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// The empty clause, always satisfied.
    True,
    /// `signal` is present in the cell at `position` relative to the focal cell.
    ///
    /// `time` is carried for rendering only; evaluation always reads a single
    /// time slice.
    Literal {
        signal: Signal,
        position: i32,
        time: i32,
    },
    /// Satisfied when the operand is not.
    Negation(Box<Clause>),
    /// Satisfied when every operand is.
    Conjunction(Vec<Clause>),
    /// Satisfied when at least one operand is. Empty means never.
    Disjunction(Vec<Clause>),
}

impl Clause {
    /// A literal at the focal cell in the current step.
    pub fn signal(signal: Signal) -> Self {
        Self::literal(signal, 0, 0)
    }

    /// A literal with explicit position and time offsets.
    pub fn literal(signal: Signal, position: i32, time: i32) -> Self {
        Self::Literal {
            signal,
            position,
            time,
        }
    }

    /// The clause that is never satisfied.
    pub fn never() -> Self {
        Self::Negation(Box::new(Self::True))
    }

    /// Negate `clause`. Negating a negation yields its operand.
    pub fn negate(clause: Clause) -> Self {
        match clause {
            Self::Negation(inner) => *inner,
            other => Self::Negation(Box::new(other)),
        }
    }

    /// Conjunction of `clauses`.
    ///
    /// Nested conjunctions are flattened and `True` operands dropped. An empty
    /// result is `True`; a single operand is returned unwrapped.
    pub fn all(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut flat = Vec::new();
        for clause in clauses {
            match clause {
                Self::Conjunction(subs) => flat.extend(subs),
                Self::True => {}
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::True,
            1 => flat.remove(0),
            _ => Self::Conjunction(flat),
        }
    }

    /// Disjunction of `clauses`.
    ///
    /// Nested disjunctions are flattened. An empty disjunction is
    /// [`Clause::never`]; a `True` operand makes the whole clause `True`.
    pub fn any(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut flat = Vec::new();
        for clause in clauses {
            match clause {
                Self::Disjunction(subs) => flat.extend(subs),
                Self::True => return Self::True,
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::never(),
            1 => flat.remove(0),
            _ => Self::Disjunction(flat),
        }
    }

    /// Evaluate against one time slice of the strip.
    ///
    /// Fails if a literal's position lies outside the neighborhood window.
    pub fn eval(&self, neighborhood: &Neighborhood<'_>) -> AutomatonResult<bool> {
        match self {
            Self::True => Ok(true),
            Self::Literal {
                signal, position, ..
            } => Ok(neighborhood.get(*position)?.contains(signal)),
            Self::Negation(inner) => Ok(!inner.eval(neighborhood)?),
            Self::Conjunction(subs) => {
                for sub in subs {
                    if !sub.eval(neighborhood)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Disjunction(subs) => {
                for sub in subs {
                    if sub.eval(neighborhood)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Canonical text form, re-parseable by the rule parser.
    pub fn render(&self, signals: &SignalTable) -> String {
        match self {
            Self::True => String::new(),
            Self::Literal {
                signal,
                position,
                time,
            } => render_literal(*signal, *position, *time, false, signals),
            Self::Negation(inner) if **inner == Self::True => "[]".to_string(),
            Self::Negation(inner) => match inner.as_ref() {
                Self::Literal {
                    signal,
                    position,
                    time,
                } => render_literal(*signal, *position, *time, true, signals),
                other => format!("-{}", other.render(signals)),
            },
            Self::Conjunction(subs) => format!("({})", render_list(subs, signals)),
            Self::Disjunction(subs) => format!("[{}]", render_list(subs, signals)),
        }
    }

    /// Every signal referenced anywhere in the tree.
    pub fn signals(&self) -> BTreeSet<Signal> {
        let mut out = BTreeSet::new();
        self.collect_signals(&mut out);
        out
    }

    /// Add every signal referenced in the tree to `out`.
    pub fn collect_signals(&self, out: &mut BTreeSet<Signal>) {
        self.visit_literals(&mut |signal, _, _| {
            out.insert(signal);
        });
    }

    /// Call `f(signal, position, time)` for every literal, left to right.
    pub fn visit_literals(&self, f: &mut dyn FnMut(Signal, i32, i32)) {
        match self {
            Self::True => {}
            Self::Literal {
                signal,
                position,
                time,
            } => f(*signal, *position, *time),
            Self::Negation(inner) => inner.visit_literals(f),
            Self::Conjunction(subs) | Self::Disjunction(subs) => {
                for sub in subs {
                    sub.visit_literals(f);
                }
            }
        }
    }
}

/// `[time/][position.][-]name`, omitting zero offsets.
fn render_literal(
    signal: Signal,
    position: i32,
    time: i32,
    negated: bool,
    signals: &SignalTable,
) -> String {
    let mut out = String::new();
    if time != 0 {
        out.push_str(&format!("{time}/"));
    }
    if position != 0 {
        out.push_str(&format!("{position}."));
    }
    if negated {
        out.push('-');
    }
    out.push_str(signals.get(signal).unwrap_or("?"));
    out
}

fn render_list(subs: &[Clause], signals: &SignalTable) -> String {
    subs.iter()
        .map(|c| c.render(signals))
        .collect::<Vec<_>>()
        .join(" ")
}
