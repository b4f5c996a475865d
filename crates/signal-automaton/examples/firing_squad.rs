//! Midpoint marking with two signals of different speeds.
//!
//! A fast signal runs right, bounces off the wall in the last cell and runs
//! back. A slow signal moves one cell every three steps. Where the returning
//! fast signal meets the slow one, a `Mid` marker is left and kept.
//!
//! Run with:
//! ```bash
//! cargo run --example firing_squad -p signal-automaton
//! ```

use signal_automaton::{Automaton, Configuration};

const RULES: &str = "\
# seeds both travellers in the first step
Init: 0/0.Fast 0/0.Slow
Wall: Wall
Mid: Mid

Fast:
  1.-Wall: 1.Fast
  1.Wall: 1/0.Back
Back:
  [Slow -1.Slow]: 0/0.Mid
  -Mid -Slow: 1/-1.Back
Slow -Mid: 3/1.Slow
";

fn main() -> anyhow::Result<()> {
    let mut automaton = Automaton::parse(RULES)?;

    println!("Rules ({} parsed):", automaton.rules().len());
    println!("{}", automaton.render());
    println!(
        "neighborhood [{}, {}], lookahead {}\n",
        automaton.min_neighbor(),
        automaton.max_neighbor(),
        automaton.max_future_depth()
    );

    let width = 16;
    let init = automaton.intern("Init");
    let wall = automaton.intern("Wall");
    let mut initial = Configuration::new(width);
    initial.insert(0, init)?;
    initial.insert(width - 1, wall)?;

    let diagram = automaton.make_diagram(initial, 30)?;
    print!("{}", diagram.render_text(automaton.signal_table()));

    let mid = automaton.signal("Mid");
    if let Some(cell) = mid.and_then(|m| {
        diagram
            .get(diagram.len() - 1)
            .and_then(|last| (0..width).find(|&c| last.contains(c, m)))
    }) {
        println!("\nMid marked at cell {cell}");
    }

    Ok(())
}
