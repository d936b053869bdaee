//! Error types for the transcoding engine.

use crate::engine::CellRef;
use thiserror::Error;

/// Errors raised while turning cells into records or records into writes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscodeError {
    #[error("There is no header")]
    NoHeader,

    #[error("Header has duplicates: {label:?}")]
    DuplicateHeader { label: String },

    #[error("Cell {cell} has a value but its column has no header")]
    MissingHeaderKey { cell: CellRef },

    #[error("Header {label:?} not found")]
    HeaderNotFound { label: String },

    #[error("Update target cell {cell} not returned")]
    UpdateTargetMissing { cell: CellRef },
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
