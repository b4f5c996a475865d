//! `sca check` and `sca signals`: inspect a rule file without simulating it.

use std::path::Path;

use anyhow::Result;

/// Parse a rule file and print its canonical form and derived bounds.
pub fn execute(rules: &Path) -> Result<()> {
    let automaton = super::load_automaton(rules)?;

    println!("{}", automaton.render());
    println!();
    println!("rules:        {}", automaton.rules().len());
    println!(
        "neighborhood: [{}, {}]",
        automaton.min_neighbor(),
        automaton.max_neighbor()
    );
    println!("lookahead:    {}", automaton.max_future_depth());

    Ok(())
}

/// List every signal referenced by a rule file, one per line.
pub fn signals(rules: &Path) -> Result<()> {
    let automaton = super::load_automaton(rules)?;

    let mut names: Vec<&str> = automaton
        .signals()
        .into_iter()
        .filter_map(|s| automaton.signal_name(s))
        .collect();
    names.sort_unstable();

    for name in names {
        println!("{name}");
    }

    Ok(())
}
