//! Parser and space-time diagram engine for one-dimensional signal cellular automata.
//!
//! A signal automaton is a strip of cells, each holding a set of named
//! signals. Rules written in a small indentation-scoped language say which
//! signals to place, where, and how many steps ahead, whenever a boolean
//! condition over the neighborhood holds.
//!
//! ## Core Concepts
//!
//! - **Signal**: an interned name, present or absent in each cell
//! - **Configuration**: the strip at one time step
//! - **Clause**: a boolean condition over a neighborhood of one configuration
//! - **Rule**: a clause plus the [`RuleOutput`]s it triggers
//! - **Automaton**: the ordered rules and the bounds derived from them
//! - **Diagram**: the configurations produced by simulation, one per step
//!
//! ## Rule Language
//!
//! ```text
//! # a signal travelling right until it meets a wall
//! Right:
//!   -Half: 1.Right
//!   Half: 1.Wall
//! [A B]: 0/0.Seen     # same-step write into the current cell
//! ```
//!
//! ## Example
//!
//! ```
//! use signal_automaton::{Automaton, Configuration};
//!
//! let mut automaton = Automaton::parse("A: 1.A").unwrap();
//! let a = automaton.intern("A");
//! let mut initial = Configuration::new(3);
//! initial.insert(0, a).unwrap();
//!
//! let diagram = automaton.make_diagram(initial, 2).unwrap();
//! assert!(diagram[2].contains(2, a));
//! ```

mod automaton;
mod clause;
pub mod config;
mod configuration;
mod diagram;
mod error;
pub mod parser;
mod rule;
mod signal;

pub use automaton::{parse_automaton, Automaton};
pub use clause::Clause;
pub use config::DiagramConfig;
pub use configuration::{Cell, Configuration, Neighborhood};
pub use diagram::{Diagram, NamedDiagram};
pub use error::{AutomatonError, AutomatonResult};
pub use parser::{parse_rules, ParsedRules};
pub use rule::{Rule, RuleOutput};
pub use signal::{Signal, SignalTable};
