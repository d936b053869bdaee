//! Write planning for row updates and inserts.
//!
//! A plan is built against cells fetched with return-empty semantics: every
//! write must land on a cell the store actually handed back for the row.

use super::{Cell, CellRef, Header, Record};
use crate::error::{Result, TranscodeError};

/// Change keys resolved to their header columns, in the order given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedChanges {
    columns: Vec<(usize, String)>,
}

impl ResolvedChanges {
    /// Resolve every key of `changes` against `header`.
    ///
    /// Fails on the first key the header does not carry, before anything has
    /// been fetched or written.
    pub fn resolve(header: &Header, changes: &Record) -> Result<Self> {
        let columns = changes
            .iter()
            .map(|(label, value)| {
                header
                    .column_of(label)
                    .map(|col| (col, value.clone()))
                    .ok_or_else(|| TranscodeError::HeaderNotFound {
                        label: label.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedChanges { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Ordered cell writes realizing one logical change, issued as one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationPlan {
    writes: Vec<Cell>,
}

impl MutationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the writes of `changes` for physical `row`.
    ///
    /// `targets` is the row as fetched from the store; each change must find
    /// its cell there or the plan fails with `UpdateTargetMissing`. Returns
    /// the number of writes added.
    pub fn assign_row(&mut self, row: usize, targets: &[Cell], changes: &ResolvedChanges) -> Result<usize> {
        for (col, value) in &changes.columns {
            let found = targets
                .iter()
                .any(|cell| cell.row == row && cell.col == *col);
            if !found {
                return Err(TranscodeError::UpdateTargetMissing {
                    cell: CellRef::new(row, *col),
                });
            }
            self.writes.push(Cell::new(row, *col, value.clone()));
        }
        Ok(changes.len())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[Cell] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<Cell> {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Header {
        Header::from_labels(["Name", "", "Age", "Weight"]).unwrap()
    }

    fn empty_row(row: usize, width: usize) -> Vec<Cell> {
        (1..=width).map(|col| Cell::new(row, col, "")).collect()
    }

    #[test]
    fn test_resolve_unknown_label() {
        let changes = Record::from([("Age", "35"), ("Height", "180")]);
        assert_eq!(
            ResolvedChanges::resolve(&header(), &changes),
            Err(TranscodeError::HeaderNotFound {
                label: "Height".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_empty_label_is_not_a_column() {
        let changes = Record::from([("", "x")]);
        assert!(ResolvedChanges::resolve(&header(), &changes).is_err());
    }

    #[test]
    fn test_assign_row_targets_columns() {
        let changes = Record::from([("Weight", "321"), ("Age", "35")]);
        let resolved = ResolvedChanges::resolve(&header(), &changes).unwrap();
        let mut plan = MutationPlan::new();
        assert_eq!(plan.assign_row(3, &empty_row(3, 4), &resolved).unwrap(), 2);
        assert_eq!(
            plan.writes(),
            [Cell::new(3, 4, "321"), Cell::new(3, 3, "35")]
        );
    }

    #[test]
    fn test_assign_row_accumulates_across_rows() {
        let resolved =
            ResolvedChanges::resolve(&header(), &Record::from([("Age", "1")])).unwrap();
        let mut plan = MutationPlan::new();
        plan.assign_row(2, &empty_row(2, 4), &resolved).unwrap();
        plan.assign_row(5, &empty_row(5, 4), &resolved).unwrap();
        assert_eq!(
            plan.into_writes(),
            vec![Cell::new(2, 3, "1"), Cell::new(5, 3, "1")]
        );
    }

    #[test]
    fn test_assign_row_missing_target() {
        let resolved =
            ResolvedChanges::resolve(&header(), &Record::from([("Weight", "1")])).unwrap();
        let mut plan = MutationPlan::new();
        let err = plan.assign_row(2, &empty_row(2, 3), &resolved).unwrap_err();
        assert_eq!(
            err,
            TranscodeError::UpdateTargetMissing {
                cell: CellRef::new(2, 4)
            }
        );
    }

    #[test]
    fn test_assign_row_ignores_cells_of_other_rows() {
        let resolved =
            ResolvedChanges::resolve(&header(), &Record::from([("Name", "x")])).unwrap();
        let mut plan = MutationPlan::new();
        assert!(plan.assign_row(2, &empty_row(3, 4), &resolved).is_err());
        assert!(plan.is_empty());
    }
}
