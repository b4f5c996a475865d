//! Per-time-step cell state and neighborhood windows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{AutomatonError, AutomatonResult};
use crate::signal::Signal;

/// Signals active in one cell.
pub type Cell = BTreeSet<Signal>;

static EMPTY_CELL: Cell = BTreeSet::new();

/// The state of the strip at one time step: a fixed number of cells, each a
/// set of active signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    cells: Vec<Cell>,
}

impl Configuration {
    /// Create a configuration of `nb_cells` empty cells.
    pub fn new(nb_cells: usize) -> Self {
        Self {
            cells: vec![Cell::new(); nb_cells],
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the configuration has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells, left to right.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The signals of one cell, if it exists.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Activate `signal` in cell `index`. Returns whether it was newly added.
    pub fn insert(&mut self, index: usize, signal: Signal) -> AutomatonResult<bool> {
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .map(|cell| cell.insert(signal))
            .ok_or(AutomatonError::CellOutOfRange { index, len })
    }

    /// Check whether cell `index` holds `signal`. Missing cells hold nothing.
    pub fn contains(&self, index: usize, signal: Signal) -> bool {
        self.cells
            .get(index)
            .is_some_and(|cell| cell.contains(&signal))
    }

    /// Indices of cells holding at least one signal.
    pub fn active_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// View the window of cells `[cell_index + min_offset, cell_index + max_offset]`.
    ///
    /// Offsets falling outside the strip see an empty cell (open boundary).
    /// Cells are resolved on access.
    pub fn neighborhood(&self, cell_index: usize, min_offset: i32, max_offset: i32) -> Neighborhood<'_> {
        Neighborhood {
            cells: &self.cells,
            cell_index,
            min_offset,
            max_offset,
        }
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }
}

/// Read-only view of the cells around one focal cell at one time step.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    cells: &'a [Cell],
    cell_index: usize,
    min_offset: i32,
    max_offset: i32,
}

impl<'a> Neighborhood<'a> {
    /// The signals at relative `offset`.
    ///
    /// Fails with [`AutomatonError::Index`] if `offset` lies outside the window.
    pub fn get(&self, offset: i32) -> AutomatonResult<&'a Cell> {
        if offset < self.min_offset || offset > self.max_offset {
            return Err(AutomatonError::Index {
                offset,
                min: self.min_offset,
                max: self.max_offset,
            });
        }
        let target = self.cell_index as i64 + i64::from(offset);
        Ok(usize::try_from(target)
            .ok()
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&EMPTY_CELL))
    }

    /// Index of the focal cell in the strip.
    pub fn cell_index(&self) -> usize {
        self.cell_index
    }

    /// Smallest offset in the window.
    pub fn min_offset(&self) -> i32 {
        self.min_offset
    }

    /// Largest offset in the window.
    pub fn max_offset(&self) -> i32 {
        self.max_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalTable;

    #[test]
    fn test_new_configuration_is_empty() {
        let config = Configuration::new(5);
        assert_eq!(config.len(), 5);
        assert!(config.cells().iter().all(|c| c.is_empty()));
        assert!(config.active_cells().is_empty());
    }

    #[test]
    fn test_insert_is_set_union() {
        let mut table = SignalTable::new();
        let a = table.intern("A");
        let mut config = Configuration::new(3);

        assert!(config.insert(1, a).unwrap());
        assert!(!config.insert(1, a).unwrap());
        assert_eq!(config.cell(1).unwrap().len(), 1);
        assert!(config.contains(1, a));
        assert!(!config.contains(7, a));
        assert_eq!(config.active_cells(), vec![1]);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut table = SignalTable::new();
        let a = table.intern("A");
        let mut config = Configuration::new(2);
        let err = config.insert(2, a).unwrap_err();
        assert!(matches!(err, AutomatonError::CellOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_neighborhood_open_boundary() {
        let mut table = SignalTable::new();
        let a = table.intern("A");
        let b = table.intern("B");
        let mut config = Configuration::new(3);
        config.insert(0, a).unwrap();
        config.insert(2, b).unwrap();

        let hood = config.neighborhood(0, -1, 2);
        assert!(hood.get(-1).unwrap().is_empty());
        assert!(hood.get(0).unwrap().contains(&a));
        assert!(hood.get(1).unwrap().is_empty());
        assert!(hood.get(2).unwrap().contains(&b));

        let edge = config.neighborhood(2, -1, 1);
        assert!(edge.get(1).unwrap().is_empty());
    }

    #[test]
    fn test_neighborhood_rejects_offsets_outside_window() {
        let config = Configuration::new(4);
        let hood = config.neighborhood(1, 0, 0);
        assert!(hood.get(0).is_ok());
        let err = hood.get(1).unwrap_err();
        assert!(matches!(err, AutomatonError::Index { offset: 1, min: 0, max: 0 }));
        assert!(hood.get(-1).is_err());
    }

    #[test]
    fn test_neighborhood_with_extreme_bounds() {
        let mut table = SignalTable::new();
        let a = table.intern("A");
        let mut config = Configuration::new(3);
        config.insert(2, a).unwrap();

        let hood = config.neighborhood(1, i32::MIN, i32::MAX);
        assert!(hood.get(1).unwrap().contains(&a));
        assert!(hood.get(i32::MAX).unwrap().is_empty());
        assert!(hood.get(i32::MIN).unwrap().is_empty());
        assert_eq!(hood.cell_index(), 1);
    }
}
