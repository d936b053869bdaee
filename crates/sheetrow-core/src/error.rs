//! Error types for Sheetrow core.

use sheetrow_engine::TranscodeError;
use sheetrow_engine::engine::CellRef;
use thiserror::Error;

/// Errors that can occur while reading or mutating a sheet.
#[derive(Error, Debug)]
pub enum SheetrowError {
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error("Sheet {title} not found in {}", .available.join(","))]
    SheetNotFound {
        title: String,
        available: Vec<String>,
    },

    #[error("Sheet {title} has no rows or columns")]
    EmptySheet { title: String },

    #[error("Row #{row} was not returned")]
    RowNotReturned { row: usize },

    #[error("Cell {cell} is outside the sheet ({row_count} rows x {col_count} columns)")]
    OutOfBounds {
        cell: CellRef,
        row_count: usize,
        col_count: usize,
    },

    /// Failure reported by a store implementation (network, auth, ...), passed through as-is.
    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, SheetrowError>;
