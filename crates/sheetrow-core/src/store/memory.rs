//! In-process cell store.
//!
//! `MemorySheet` behaves like a remote sheet with fixed bounds: range fetches
//! are clipped, writes outside the bounds are rejected, and deleting a row
//! shifts everything below it up. Clones share the same grid, so a test can
//! keep one handle for assertions while a `Book` owns another.

use super::{CellRange, CellStore, RowHandle, SheetBounds, Workbook};
use crate::error::{Result, SheetrowError};
use dashmap::DashMap;
use sheetrow_engine::engine::{Cell, CellRef};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Non-blank cell values by address. DashMap is internally Arc-based, clones are cheap.
pub type Grid = Arc<DashMap<CellRef, String>>;

/// A mutation the store has applied, in the order it was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    BulkWrite(Vec<Cell>),
    DeleteRow(usize),
}

#[derive(Clone, Debug)]
pub struct MemorySheet {
    title: Arc<str>,
    grid: Grid,
    row_count: Arc<AtomicUsize>,
    col_count: Arc<AtomicUsize>,
    events: Arc<Mutex<Vec<StoreEvent>>>,
}

impl MemorySheet {
    /// An empty sheet with the given bounds.
    pub fn new(title: &str, bounds: SheetBounds) -> Self {
        MemorySheet {
            title: Arc::from(title),
            grid: Arc::new(DashMap::new()),
            row_count: Arc::new(AtomicUsize::new(bounds.row_count)),
            col_count: Arc::new(AtomicUsize::new(bounds.col_count)),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A sheet laid out from A1, sized exactly to `rows`.
    pub fn from_rows<R, S>(title: &str, rows: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let width = rows
            .iter()
            .map(|row| {
                let row: &[S] = row.as_ref();
                row.len()
            })
            .max()
            .unwrap_or(0);
        let sheet = Self::new(title, SheetBounds::new(rows.len().max(1), width.max(1)));
        for (r, row) in rows.iter().enumerate() {
            let row: &[S] = row.as_ref();
            for (c, value) in row.iter().enumerate() {
                sheet.set(r + 1, c + 1, value.as_ref());
            }
        }
        sheet
    }

    /// Resize the sheet. Cells outside the new bounds are dropped.
    pub fn with_bounds(self, bounds: SheetBounds) -> Self {
        self.grid
            .retain(|cell_ref, _| bounds.contains(cell_ref.row, cell_ref.col));
        self.row_count.store(bounds.row_count, Ordering::SeqCst);
        self.col_count.store(bounds.col_count, Ordering::SeqCst);
        self
    }

    /// Set a cell directly, bypassing bounds checks and the event log.
    pub fn set(&self, row: usize, col: usize, value: &str) {
        let cell_ref = CellRef::new(row, col);
        if value.is_empty() {
            self.grid.remove(&cell_ref);
        } else {
            self.grid.insert(cell_ref, value.to_string());
        }
    }

    pub fn value(&self, row: usize, col: usize) -> String {
        self.grid
            .get(&CellRef::new(row, col))
            .map(|value| value.value().clone())
            .unwrap_or_default()
    }

    pub fn current_bounds(&self) -> SheetBounds {
        SheetBounds::new(
            self.row_count.load(Ordering::SeqCst),
            self.col_count.load(Ordering::SeqCst),
        )
    }

    /// The populated part of the grid as dense rows, from A1 to the last
    /// non-blank row and column.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut last_row = 0;
        let mut last_col = 0;
        for entry in self.grid.iter() {
            last_row = last_row.max(entry.key().row);
            last_col = last_col.max(entry.key().col);
        }
        (1..=last_row)
            .map(|row| (1..=last_col).map(|col| self.value(row, col)).collect())
            .collect()
    }

    /// Mutations applied through the [`CellStore`] interface so far.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, event: StoreEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl CellStore for MemorySheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn bounds(&self) -> Result<SheetBounds> {
        Ok(self.current_bounds())
    }

    fn fetch_cells(&self, range: &CellRange) -> Result<Vec<Cell>> {
        let bounds = self.current_bounds();
        let max_row = range.max_row.min(bounds.row_count);
        let max_col = range.max_col.min(bounds.col_count);
        let min_row = range.min_row.max(1);
        let min_col = range.min_col.max(1);

        let mut cells = Vec::new();
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                match self.grid.get(&CellRef::new(row, col)) {
                    Some(value) => cells.push(Cell::new(row, col, value.as_str())),
                    None if range.return_empty => cells.push(Cell::new(row, col, "")),
                    None => {}
                }
            }
        }
        debug!(sheet = %self.title, ?range, returned = cells.len(), "fetched cells");
        Ok(cells)
    }

    fn fetch_row_handles(&self, offset: usize, limit: usize) -> Result<Vec<RowHandle>> {
        let row_count = self.current_bounds().row_count;
        let first = offset.max(1) + 1;
        Ok((first..first.saturating_add(limit))
            .take_while(|row| *row <= row_count)
            .map(|row| RowHandle { row })
            .collect())
    }

    fn delete_row(&mut self, handle: RowHandle) -> Result<()> {
        let bounds = self.current_bounds();
        if handle.row < 2 || handle.row > bounds.row_count {
            return Err(SheetrowError::OutOfBounds {
                cell: CellRef::new(handle.row, 1),
                row_count: bounds.row_count,
                col_count: bounds.col_count,
            });
        }

        // Collect first: mutating a DashMap while iterating it deadlocks.
        let moved: Vec<(CellRef, String)> = self
            .grid
            .iter()
            .filter(|entry| entry.key().row >= handle.row)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        for (cell_ref, _) in &moved {
            self.grid.remove(cell_ref);
        }
        for (cell_ref, value) in moved {
            if cell_ref.row > handle.row {
                self.grid
                    .insert(CellRef::new(cell_ref.row - 1, cell_ref.col), value);
            }
        }

        self.row_count.store(bounds.row_count - 1, Ordering::SeqCst);
        self.record(StoreEvent::DeleteRow(handle.row));
        debug!(sheet = %self.title, row = handle.row, "deleted row");
        Ok(())
    }

    fn bulk_write(&mut self, cells: &[Cell]) -> Result<()> {
        let bounds = self.current_bounds();
        if let Some(outside) = cells.iter().find(|cell| !bounds.contains(cell.row, cell.col)) {
            return Err(SheetrowError::OutOfBounds {
                cell: outside.cell_ref(),
                row_count: bounds.row_count,
                col_count: bounds.col_count,
            });
        }

        for cell in cells {
            self.set(cell.row, cell.col, &cell.value);
        }
        self.record(StoreEvent::BulkWrite(cells.to_vec()));
        debug!(sheet = %self.title, cells = cells.len(), "wrote cell batch");
        Ok(())
    }
}

/// Sheets held in memory, opened by title.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: MemorySheet) -> Self {
        self.sheets.push(sheet);
        self
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheet_titles(&self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|sheet| sheet.title.to_string()).collect())
    }

    fn open_sheet(&self, title: &str) -> Result<Option<MemorySheet>> {
        Ok(self
            .sheets
            .iter()
            .find(|sheet| &*sheet.title == title)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> MemorySheet {
        MemorySheet::from_rows(
            "People",
            &[
                vec!["Name", "Age"],
                vec!["Andreas", "34"],
                vec!["Ben", ""],
                vec!["Cleo", "7"],
            ],
        )
    }

    #[test]
    fn test_sparse_fetch_omits_blanks() {
        let sheet = people();
        let cells = sheet.fetch_cells(&CellRange::new(3, 3, 1, 2)).unwrap();
        assert_eq!(cells, vec![Cell::new(3, 1, "Ben")]);
    }

    #[test]
    fn test_return_empty_fetch_fills_blanks() {
        let sheet = people();
        let cells = sheet.fetch_cells(&CellRange::row(3, 2).with_empty()).unwrap();
        assert_eq!(cells, vec![Cell::new(3, 1, "Ben"), Cell::new(3, 2, "")]);
    }

    #[test]
    fn test_fetch_is_clipped_and_row_major() {
        let sheet = people();
        let cells = sheet
            .fetch_cells(&CellRange::new(1, 100, 1, 100).with_empty())
            .unwrap();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0].cell_ref(), CellRef::new(1, 1));
        assert_eq!(cells[1].cell_ref(), CellRef::new(1, 2));
        assert_eq!(cells[7].cell_ref(), CellRef::new(4, 2));
    }

    #[test]
    fn test_delete_row_shifts_up() {
        let mut sheet = people();
        sheet.delete_row(RowHandle { row: 2 }).unwrap();
        assert_eq!(sheet.current_bounds(), SheetBounds::new(3, 2));
        assert_eq!(sheet.value(2, 1), "Ben");
        assert_eq!(sheet.value(3, 1), "Cleo");
        assert_eq!(sheet.value(4, 1), "");
        assert_eq!(sheet.events(), vec![StoreEvent::DeleteRow(2)]);
    }

    #[test]
    fn test_delete_header_row_rejected() {
        let mut sheet = people();
        assert!(sheet.delete_row(RowHandle { row: 1 }).is_err());
        assert!(sheet.delete_row(RowHandle { row: 5 }).is_err());
        assert!(sheet.events().is_empty());
    }

    #[test]
    fn test_bulk_write_rejects_whole_batch_out_of_bounds() {
        let mut sheet = people();
        let err = sheet
            .bulk_write(&[Cell::new(2, 2, "35"), Cell::new(5, 1, "Dora")])
            .unwrap_err();
        assert!(matches!(err, SheetrowError::OutOfBounds { .. }));
        assert_eq!(sheet.value(2, 2), "34");
        assert!(sheet.events().is_empty());
    }

    #[test]
    fn test_bulk_write_clears_with_empty_value() {
        let mut sheet = people();
        sheet
            .bulk_write(&[Cell::new(2, 2, ""), Cell::new(3, 2, "9")])
            .unwrap();
        assert_eq!(sheet.value(2, 2), "");
        assert_eq!(sheet.value(3, 2), "9");
        assert_eq!(sheet.events().len(), 1);
    }

    #[test]
    fn test_row_handles() {
        let sheet = people();
        assert_eq!(
            sheet.fetch_row_handles(1, 2).unwrap(),
            vec![RowHandle { row: 2 }, RowHandle { row: 3 }]
        );
        assert_eq!(sheet.fetch_row_handles(3, 1).unwrap(), vec![RowHandle { row: 4 }]);
        assert!(sheet.fetch_row_handles(4, 1).unwrap().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let sheet = people();
        let mut other = sheet.clone();
        other.bulk_write(&[Cell::new(4, 2, "8")]).unwrap();
        assert_eq!(sheet.value(4, 2), "8");
        assert_eq!(sheet.events().len(), 1);
    }

    #[test]
    fn test_rows_trims_to_populated_area() {
        let sheet = people().with_bounds(SheetBounds::new(1000, 26));
        assert_eq!(sheet.rows().len(), 4);
        assert_eq!(sheet.rows()[2], vec!["Ben".to_string(), String::new()]);
    }

    #[test]
    fn test_workbook_opens_by_title() {
        let workbook = MemoryWorkbook::new().with_sheet(people());
        assert_eq!(workbook.sheet_titles().unwrap(), vec!["People".to_string()]);
        assert!(workbook.open_sheet("People").unwrap().is_some());
        assert!(workbook.open_sheet("people").unwrap().is_none());
    }
}
