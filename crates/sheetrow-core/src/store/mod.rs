//! The cell store contract and its implementations.
//!
//! A store is whatever holds the grid: a remote spreadsheet service, a CSV
//! file, or plain memory. `Book` only ever talks to it through [`CellStore`].

mod csv;
mod memory;

pub use self::csv::{CsvSheet, CsvWorkbook, render_csv};
pub use memory::{MemorySheet, MemoryWorkbook, StoreEvent};

use crate::error::Result;
use sheetrow_engine::engine::Cell;

/// Row and column bounds of a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetBounds {
    pub row_count: usize,
    pub col_count: usize,
}

impl SheetBounds {
    pub fn new(row_count: usize, col_count: usize) -> Self {
        SheetBounds {
            row_count,
            col_count,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (1..=self.row_count).contains(&row) && (1..=self.col_count).contains(&col)
    }
}

/// Rectangular range query, 1-indexed and inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
    /// Return a cell for every position in range, blank or not.
    pub return_empty: bool,
}

impl CellRange {
    pub fn new(min_row: usize, max_row: usize, min_col: usize, max_col: usize) -> Self {
        CellRange {
            min_row,
            max_row,
            min_col,
            max_col,
            return_empty: false,
        }
    }

    /// Columns `1..=width` of a single row.
    pub fn row(row: usize, width: usize) -> Self {
        Self::new(row, row, 1, width)
    }

    /// The whole sheet.
    pub fn sheet(bounds: SheetBounds) -> Self {
        Self::new(1, bounds.row_count, 1, bounds.col_count)
    }

    pub fn with_empty(mut self) -> Self {
        self.return_empty = true;
        self
    }
}

/// Handle to a physical row, used only to delete it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowHandle {
    pub row: usize,
}

/// What a sheet store must provide.
///
/// Every call is a blocking round-trip; nothing here caches. Cells come back
/// sorted row-major, and blank cells are left out unless the range asks for
/// them with `return_empty`.
pub trait CellStore {
    fn title(&self) -> &str;

    fn bounds(&self) -> Result<SheetBounds>;

    /// Cells in `range`, clipped to the sheet bounds.
    fn fetch_cells(&self, range: &CellRange) -> Result<Vec<Cell>>;

    /// Handles for up to `limit` data rows starting at `offset`.
    /// Offsets count data rows from 1, so offset 1 is physical row 2.
    fn fetch_row_handles(&self, offset: usize, limit: usize) -> Result<Vec<RowHandle>>;

    /// Remove a whole physical row; rows below move up by one.
    fn delete_row(&mut self, handle: RowHandle) -> Result<()>;

    /// Apply `cells` as a single batch. An empty value clears the cell.
    fn bulk_write(&mut self, cells: &[Cell]) -> Result<()>;
}

/// A named collection of sheets.
pub trait Workbook {
    type Sheet: CellStore;

    fn sheet_titles(&self) -> Result<Vec<String>>;

    /// Open the sheet titled `title`, or `None` when there is no such sheet.
    fn open_sheet(&self, title: &str) -> Result<Option<Self::Sheet>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains() {
        let bounds = SheetBounds::new(3, 2);
        assert!(bounds.contains(1, 1));
        assert!(bounds.contains(3, 2));
        assert!(!bounds.contains(0, 1));
        assert!(!bounds.contains(4, 1));
        assert!(!bounds.contains(1, 3));
    }

    #[test]
    fn test_row_range() {
        let range = CellRange::row(5, 3).with_empty();
        assert_eq!(range.min_row, 5);
        assert_eq!(range.max_row, 5);
        assert_eq!(range.min_col, 1);
        assert_eq!(range.max_col, 3);
        assert!(range.return_empty);
    }
}
