//! Transcoding engine API.
//!
//! - [`Cell`], [`CellRef`], [`CellLookup`] - addressed cells and sparse lookup
//! - [`extract_header`] - derive the [`Header`] from row 1
//! - [`reconstruct_rows`] - rebuild [`Record`]s from the data rows
//! - [`Criteria`] - equality filter over records
//! - [`MutationPlan`] - minimal cell writes for updates and inserts

mod cell;
mod cell_ref;
mod criteria;
mod header;
mod plan;
mod record;
mod rows;

pub use cell::{Cell, CellLookup};
pub use cell_ref::CellRef;
pub use criteria::Criteria;
pub use header::{Header, extract_header};
pub use plan::{MutationPlan, ResolvedChanges};
pub use record::Record;
pub use rows::reconstruct_rows;
