use super::CellRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One addressed cell as returned by (or written to) a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl Cell {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        Cell {
            row,
            col,
            value: value.into(),
        }
    }

    pub fn cell_ref(&self) -> CellRef {
        CellRef::new(self.row, self.col)
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

/// Sparse view over a fetched cell list, keyed by address.
///
/// Stores omit blank cells from range results, so anything not present here
/// reads as the empty string. Built once per fetch; lookups do not depend on
/// the order the store returned the cells in.
#[derive(Debug, Default)]
pub struct CellLookup<'a> {
    values: HashMap<CellRef, &'a str>,
    last_row: usize,
}

impl<'a> CellLookup<'a> {
    pub fn from_cells(cells: &'a [Cell]) -> Self {
        let mut values = HashMap::with_capacity(cells.len());
        let mut last_row = 0;
        for cell in cells {
            // First occurrence wins if a store ever repeats an address.
            values.entry(cell.cell_ref()).or_insert(cell.value.as_str());
            if !cell.is_blank() {
                last_row = last_row.max(cell.row);
            }
        }
        CellLookup { values, last_row }
    }

    /// Value at `(row, col)`, or "" when the cell was not returned.
    pub fn value(&self, row: usize, col: usize) -> &'a str {
        self.values
            .get(&CellRef::new(row, col))
            .copied()
            .unwrap_or("")
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.values.contains_key(&CellRef::new(row, col))
    }

    /// Highest row holding a non-blank value (0 when there is none).
    pub fn last_row(&self) -> usize {
        self.last_row
    }

    /// Non-blank cells of `row`, in ascending column order.
    pub fn row_cells(&self, row: usize) -> Vec<(usize, &'a str)> {
        let mut cells: Vec<(usize, &'a str)> = self
            .values
            .iter()
            .filter(|(cell_ref, value)| cell_ref.row == row && !value.is_empty())
            .map(|(cell_ref, value)| (cell_ref.col, *value))
            .collect();
        cells.sort_by_key(|(col, _)| *col);
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells_read_as_empty() {
        let cells = vec![Cell::new(1, 1, "Name"), Cell::new(2, 3, "x")];
        let lookup = CellLookup::from_cells(&cells);
        assert_eq!(lookup.value(1, 1), "Name");
        assert_eq!(lookup.value(2, 3), "x");
        assert_eq!(lookup.value(2, 2), "");
        assert!(!lookup.contains(2, 2));
    }

    #[test]
    fn test_lookup_ignores_input_order() {
        let cells = vec![
            Cell::new(3, 2, "c"),
            Cell::new(1, 2, "b"),
            Cell::new(1, 1, "a"),
        ];
        let lookup = CellLookup::from_cells(&cells);
        assert_eq!(lookup.row_cells(1), vec![(1, "a"), (2, "b")]);
        assert_eq!(lookup.last_row(), 3);
    }

    #[test]
    fn test_last_row_skips_blank_cells() {
        let cells = vec![Cell::new(1, 1, "a"), Cell::new(9, 1, "")];
        let lookup = CellLookup::from_cells(&cells);
        assert_eq!(lookup.last_row(), 1);
        assert!(lookup.contains(9, 1));
    }
}
