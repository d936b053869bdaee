//! sheetrow-core - Record-level access to sheets held in a cell store.

pub mod book;
pub mod error;
pub mod store;

pub use book::{Book, DeleteSummary, Table, UpdateSummary};
pub use error::{Result, SheetrowError};
pub use store::{CellRange, CellStore, RowHandle, SheetBounds, Workbook};

pub use sheetrow_engine::engine::{Cell, CellRef, Criteria, Header, Record};
