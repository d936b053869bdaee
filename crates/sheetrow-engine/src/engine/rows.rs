//! Record reconstruction.
//!
//! Walks data rows (row 2 onwards) across the full header width, filling
//! absent cells with "". The first row whose every column is blank is the end
//! of the data: it is not emitted and nothing below it is read, whatever the
//! sheet's row count says.

use super::{Cell, CellLookup, CellRef, Header, Record};
use crate::error::{Result, TranscodeError};

/// Rebuild the data rows of a sheet from a (possibly sparse) cell list.
///
/// `row_count` is the sheet's row bound. A sheet of exactly one row holds only
/// the header and yields no records without looking at `cells`.
pub fn reconstruct_rows(cells: &[Cell], header: &Header, row_count: usize) -> Result<Vec<Record>> {
    if row_count <= 1 {
        return Ok(Vec::new());
    }

    let lookup = CellLookup::from_cells(cells);
    // Rows below the last non-blank cell are blank, so the walk stops there
    // at the latest.
    let last_row = row_count.min(lookup.last_row() + 1);

    let mut records = Vec::new();
    for row in 2..=last_row {
        match reconstruct_row(&lookup, header, row)? {
            Some(record) => records.push(record),
            None => break,
        }
    }
    Ok(records)
}

/// Rebuild one row. Returns `None` when every column is blank.
fn reconstruct_row(lookup: &CellLookup<'_>, header: &Header, row: usize) -> Result<Option<Record>> {
    let mut record = Record::new();
    let mut row_is_blank = true;

    for (col, label) in header.columns() {
        let value = lookup.value(row, col);
        if !value.is_empty() {
            row_is_blank = false;
        }

        if label.is_empty() {
            if !value.is_empty() {
                return Err(TranscodeError::MissingHeaderKey {
                    cell: CellRef::new(row, col),
                });
            }
            continue;
        }

        record.insert(label, value);
    }

    Ok((!row_is_blank).then_some(record))
}
