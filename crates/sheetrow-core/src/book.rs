//! Record-level operations on one sheet.
//!
//! Every operation starts from a fresh fetch of the whole sheet: header and
//! records are re-derived each time and never cached between calls. Writes go
//! out as one batch per logical operation. Nothing is rolled back when an
//! operation fails part way, and nothing is retried.

use crate::error::{Result, SheetrowError};
use crate::store::{CellRange, CellStore, SheetBounds, Workbook};
use sheetrow_engine::engine::{
    Criteria, Header, MutationPlan, Record, ResolvedChanges, extract_header, reconstruct_rows,
};
use tracing::{debug, info};

/// Header and records of a sheet as of one fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Header,
    pub records: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `criteria`, in row order.
    pub fn find(&self, criteria: &Criteria) -> Vec<&Record> {
        criteria.filter(&self.records)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub updated_row_count: usize,
    pub updated_cell_count: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted_row_count: usize,
}

/// Physical row of the record at `index` (row 1 is the header).
fn physical_row(index: usize) -> usize {
    index + 2
}

/// One sheet, read and written as header-keyed records.
#[derive(Debug)]
pub struct Book<S> {
    store: S,
}

impl<S: CellStore> Book<S> {
    pub fn new(store: S) -> Self {
        Book { store }
    }

    /// Open the sheet titled `title` in `workbook`.
    pub fn open<W>(workbook: &W, title: &str) -> Result<Self>
    where
        W: Workbook<Sheet = S>,
    {
        match workbook.open_sheet(title)? {
            Some(store) => Ok(Book::new(store)),
            None => Err(SheetrowError::SheetNotFound {
                title: title.to_string(),
                available: workbook.sheet_titles()?,
            }),
        }
    }

    pub fn title(&self) -> &str {
        self.store.title()
    }

    fn bounds(&self) -> Result<SheetBounds> {
        let bounds = self.store.bounds()?;
        if bounds.row_count == 0 || bounds.col_count == 0 {
            return Err(SheetrowError::EmptySheet {
                title: self.title().to_string(),
            });
        }
        Ok(bounds)
    }

    /// Fetch row 1 only and derive the header from it.
    pub fn fetch_header(&self) -> Result<Header> {
        let bounds = self.bounds()?;
        let cells = self
            .store
            .fetch_cells(&CellRange::row(1, bounds.col_count))?;
        Ok(extract_header(&cells)?)
    }

    /// Fetch every cell of the sheet and rebuild header and records.
    pub fn fetch(&self) -> Result<Table> {
        let bounds = self.bounds()?;
        let cells = self.store.fetch_cells(&CellRange::sheet(bounds))?;
        let header = extract_header(&cells)?;
        let records = reconstruct_rows(&cells, &header, bounds.row_count)?;
        debug!(
            sheet = self.title(),
            cells = cells.len(),
            columns = header.len(),
            records = records.len(),
            "fetched sheet"
        );
        Ok(Table { header, records })
    }

    /// Fetch and keep only the records matching `criteria`.
    pub fn find(&self, criteria: &Criteria) -> Result<Vec<Record>> {
        let table = self.fetch()?;
        Ok(table.find(criteria).into_iter().cloned().collect())
    }

    /// Set the `changes` columns on every record matching `criteria`.
    ///
    /// Matching rows are visited in row order and their writes collected into
    /// a single batch. No match is not an error, and change keys are only
    /// looked up in the header once some record matches.
    pub fn update_row(&mut self, criteria: &Criteria, changes: &Record) -> Result<UpdateSummary> {
        let table = self.fetch()?;
        let matching = criteria.matching_indexes(&table.records);
        if matching.is_empty() {
            info!(sheet = self.title(), "no rows to update");
            return Ok(UpdateSummary::default());
        }
        let resolved = ResolvedChanges::resolve(&table.header, changes)?;

        let mut plan = MutationPlan::new();
        let mut updated_row_count = 0;
        for index in matching {
            let row = physical_row(index);
            let targets = self
                .store
                .fetch_cells(&CellRange::row(row, table.header.len()).with_empty())?;
            plan.assign_row(row, &targets, &resolved)?;
            updated_row_count += 1;
        }

        let summary = UpdateSummary {
            updated_row_count,
            updated_cell_count: plan.len(),
        };
        if !plan.is_empty() {
            self.store.bulk_write(plan.writes())?;
        }
        info!(
            sheet = self.title(),
            rows = summary.updated_row_count,
            cells = summary.updated_cell_count,
            "updated rows"
        );
        Ok(summary)
    }

    /// Append `record` directly after the last record.
    ///
    /// The target row is `records + 2` whatever lies further down the sheet;
    /// stray rows below a blank row are not looked for.
    pub fn insert_row(&mut self, record: &Record) -> Result<()> {
        let table = self.fetch()?;
        let resolved = ResolvedChanges::resolve(&table.header, record)?;

        let row = physical_row(table.len());
        let targets = self
            .store
            .fetch_cells(&CellRange::row(row, table.header.len()).with_empty())?;

        let mut plan = MutationPlan::new();
        plan.assign_row(row, &targets, &resolved)?;
        if !plan.is_empty() {
            self.store.bulk_write(plan.writes())?;
        }
        info!(sheet = self.title(), row, cells = plan.len(), "inserted row");
        Ok(())
    }

    /// Insert `records` one after another; each insert completes before the
    /// next starts. Stops at the first failure, keeping earlier inserts.
    pub fn insert_rows(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            self.insert_row(record)?;
        }
        Ok(())
    }

    /// Delete every physical row whose record matches `criteria`.
    pub fn delete_rows(&mut self, criteria: &Criteria) -> Result<DeleteSummary> {
        let table = self.fetch()?;

        let mut deleted_row_count = 0;
        // Highest row first: removing a row shifts every row below it up.
        for index in criteria.matching_indexes(&table.records).into_iter().rev() {
            let handle = self
                .store
                .fetch_row_handles(index + 1, 1)?
                .into_iter()
                .next()
                .ok_or(SheetrowError::RowNotReturned {
                    row: physical_row(index),
                })?;
            self.store.delete_row(handle)?;
            deleted_row_count += 1;
        }

        info!(sheet = self.title(), rows = deleted_row_count, "deleted rows");
        Ok(DeleteSummary { deleted_row_count })
    }
}
