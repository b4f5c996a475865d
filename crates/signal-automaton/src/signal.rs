//! Signal interning.
//!
//! Signal names are interned once during parsing into small integer handles.
//! Handles compare and hash as integers; the owning [`SignalTable`] maps them
//! back to names for rendering and export.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Interned handle for a signal name.
///
/// Two handles from the same table are equal iff their names are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signal(u32);

impl Signal {
    /// Position of this signal in its table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional name <-> handle map. Grows monotonically; no removal.
#[derive(Debug, Clone, Default)]
pub struct SignalTable {
    names: Vec<String>,
    ids: HashMap<String, Signal>,
}

impl SignalTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `name`, creating it on first reference.
    pub fn intern(&mut self, name: &str) -> Signal {
        if let Some(signal) = self.ids.get(name) {
            return *signal;
        }
        let signal = Signal(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), signal);
        signal
    }

    /// Look up an existing handle without interning.
    pub fn lookup(&self, name: &str) -> Option<Signal> {
        self.ids.get(name).copied()
    }

    /// Name of an interned signal, or `None` for a handle from another table.
    pub fn get(&self, signal: Signal) -> Option<&str> {
        self.names.get(signal.index()).map(String::as_str)
    }

    /// Name of an interned signal.
    ///
    /// # Panics
    ///
    /// Panics if `signal` was not produced by this table.
    pub fn name_of(&self, signal: Signal) -> &str {
        &self.names[signal.index()]
    }

    /// Number of interned signals.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no signal has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(handle, name)` pairs in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (Signal, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Signal(i as u32), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut table = SignalTable::new();
        let a = table.intern("A");
        let b = table.intern("B");
        assert_ne!(a, b);
        assert_eq!(table.intern("A"), a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_reverse_lookup() {
        let mut table = SignalTable::new();
        let wall = table.intern("Wall");
        assert_eq!(table.name_of(wall), "Wall");
        assert_eq!(table.lookup("Wall"), Some(wall));
        assert_eq!(table.lookup("Missing"), None);
        assert_eq!(table.get(Signal(42)), None);
    }

    #[test]
    fn test_iter_in_interning_order() {
        let mut table = SignalTable::new();
        table.intern("Right");
        table.intern("Half");
        table.intern("Right");
        let names: Vec<&str> = table.iter().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["Right", "Half"]);
    }
}
