//! Header extraction.
//!
//! Row 1 of a sheet names the columns. Range queries only return cells that
//! hold something, so the column span is taken from the right-most labeled
//! cell rather than from how many cells came back. Gaps before that column
//! become empty labels; nothing past it is treated as a column.

use super::{Cell, CellLookup};
use crate::error::{Result, TranscodeError};
use std::collections::HashSet;

/// Ordered column labels of a sheet. Index 0 is column 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    labels: Vec<String>,
}

impl Header {
    /// Build a header from explicit labels, rejecting duplicate non-empty labels.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for label in labels.iter().filter(|label| !label.is_empty()) {
            if !seen.insert(label.as_str()) {
                return Err(TranscodeError::DuplicateHeader {
                    label: label.clone(),
                });
            }
        }
        Ok(Header { labels })
    }

    /// Number of columns, including unlabeled ones.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of a 1-indexed column ("" for unlabeled columns).
    pub fn label(&self, col: usize) -> Option<&str> {
        col.checked_sub(1)
            .and_then(|index| self.labels.get(index))
            .map(String::as_str)
    }

    /// 1-indexed column carrying `label`. The empty label never resolves.
    pub fn column_of(&self, label: &str) -> Option<usize> {
        if label.is_empty() {
            return None;
        }
        self.labels
            .iter()
            .position(|candidate| candidate == label)
            .map(|index| index + 1)
    }

    /// Iterate `(col, label)` for every column, labeled or not.
    pub fn columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, label)| (index + 1, label.as_str()))
    }
}

impl IntoIterator for Header {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter()
    }
}

/// Derive the header from the row-1 cells in `cells`.
///
/// Cells from other rows are ignored, so the same cell list used for row
/// reconstruction can be passed in.
pub fn extract_header(cells: &[Cell]) -> Result<Header> {
    let lookup = CellLookup::from_cells(cells);
    let row = lookup.row_cells(1);

    let Some(&(last_col, _)) = row.last() else {
        return Err(TranscodeError::NoHeader);
    };

    Header::from_labels((1..=last_col).map(|col| lookup.value(1, col)))
}
