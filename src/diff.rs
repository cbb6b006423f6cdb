//! Minimal write-back: compares edited working rows against the last-synced
//! projection values and emits one cell write per changed cell.
//!
//! Writing only changed cells avoids redundant store calls and avoids
//! clobbering concurrent external edits to unrelated cells. It does not
//! protect against concurrent edits to the same cell; there the last writer
//! wins.

use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::HostbookError;
use crate::record::col;
use crate::sheets::{CellAddress, CellWrite};
use crate::sync::Projection;
use crate::workflow::Status;

/// The four status-filtered views of the tracked table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ProjectionKind {
    Receipt,
    Pairing,
    Done,
    Ignored,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 4] = [
        ProjectionKind::Receipt,
        ProjectionKind::Pairing,
        ProjectionKind::Done,
        ProjectionKind::Ignored,
    ];

    /// The status whose records this view contains.
    pub fn status(self) -> Status {
        match self {
            ProjectionKind::Receipt => Status::ReceiptPending,
            ProjectionKind::Pairing => Status::PairingPending,
            ProjectionKind::Done => Status::Paired,
            ProjectionKind::Ignored => Status::Ignored,
        }
    }

    /// Tracked-table positions of this view's editable columns, in view
    /// order. The receipt and ignored views expose three data columns, the
    /// pairing and done views five. The sheet row rides along separately and
    /// is never part of a diff.
    pub fn view_columns(self) -> &'static [usize] {
        match self {
            ProjectionKind::Receipt | ProjectionKind::Ignored => {
                &[col::HOSTING_DATE, col::CANDIDATE_NAME, col::EMAIL]
            }
            ProjectionKind::Pairing | ProjectionKind::Done => &[
                col::HOST_NAME,
                col::HOST_EMAIL,
                col::HOSTING_DATE,
                col::CANDIDATE_NAME,
                col::EMAIL,
            ],
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionKind::Receipt => write!(f, "receipt"),
            ProjectionKind::Pairing => write!(f, "pairing"),
            ProjectionKind::Done => write!(f, "done"),
            ProjectionKind::Ignored => write!(f, "ignored"),
        }
    }
}

/// An editable copy of one projection row: the view-order cell values plus
/// the sheet row they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingRow {
    pub row: u32,
    pub cells: Vec<String>,
}

/// Builds the editable working copy of a projection.
pub fn working_rows(projection: &Projection) -> Vec<WorkingRow> {
    let columns = projection.kind.view_columns();
    projection
        .rows
        .iter()
        .map(|candidate| WorkingRow {
            row: candidate.row,
            cells: columns
                .iter()
                .map(|&c| candidate.field(c).unwrap_or_default().to_string())
                .collect(),
        })
        .collect()
}

/// Maps a view cell back to its absolute tracked-table address.
pub fn cell_address(
    kind: ProjectionKind,
    tracked_sheet: &str,
    sheet_row: u32,
    view_column: usize,
) -> Result<CellAddress, HostbookError> {
    let column = kind
        .view_columns()
        .get(view_column)
        .copied()
        .ok_or(HostbookError::InvalidColumn {
            kind,
            column: view_column,
        })?;
    Ok(CellAddress {
        sheet: tracked_sheet.to_string(),
        column,
        row: sheet_row,
    })
}

/// Compares working rows against the projection they were exported from and
/// returns a write for each cell whose value differs from the last-synced
/// one. Comparison is value-based (trimmed string equality); unchanged rows
/// produce nothing, so re-saving an untouched export is a no-op.
pub fn compute_diff(
    kind: ProjectionKind,
    tracked_sheet: &str,
    working: &[WorkingRow],
    baseline: &Projection,
) -> Result<Vec<CellWrite>, HostbookError> {
    let by_row: HashMap<u32, &crate::record::Candidate> =
        baseline.rows.iter().map(|c| (c.row, c)).collect();
    let columns = kind.view_columns();

    let mut writes = Vec::new();
    for working_row in working {
        let candidate = by_row
            .get(&working_row.row)
            .ok_or(HostbookError::RowNotFound(working_row.row))?;
        for (view_column, cell) in working_row.cells.iter().enumerate() {
            let tracked_column =
                columns
                    .get(view_column)
                    .copied()
                    .ok_or(HostbookError::InvalidColumn {
                        kind,
                        column: view_column,
                    })?;
            let synced = candidate.field(tracked_column).unwrap_or_default();
            if cell.trim() != synced.trim() {
                writes.push(CellWrite {
                    address: cell_address(kind, tracked_sheet, working_row.row, view_column)?,
                    value: cell.clone(),
                });
            }
        }
    }
    Ok(writes)
}
