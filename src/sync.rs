//! Mirrors the record store into an in-memory working set and keeps the four
//! status projections derived from it.
//!
//! The engine exclusively owns the tracked-table snapshot and the
//! projections; both are replaced wholesale on every refresh and never
//! mutated in place by other components. Everything downstream works on
//! copies, so a refresh can never corrupt an in-flight diff computation.

use crate::dates;
use crate::diff::ProjectionKind;
use crate::record::{Candidate, col};
use crate::sheets::{CellAddress, RecordStore, SheetsError, column_letter};
use crate::workflow::StatusWorkflow;

/// A status-filtered, date-ordered view of the tracked records. Rebuilt on
/// every sync, never persisted.
#[derive(Debug, Clone)]
pub struct Projection {
    pub kind: ProjectionKind,
    pub rows: Vec<Candidate>,
}

/// What a refresh did, for the presentation layer to render.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Intake rows promoted into the tracked table during this refresh.
    pub promoted: usize,
    /// Non-fatal date warnings collected while ordering the projections.
    pub warnings: Vec<String>,
    /// Row count per projection, in [`ProjectionKind::ALL`] order.
    pub counts: [(ProjectionKind, usize); 4],
}

pub struct SyncEngine<S> {
    store: S,
    intake_sheet: String,
    tracked_sheet: String,
    /// Raw intake rows as last read, header included.
    intake: Vec<Vec<String>>,
    /// Tracked candidates as last read, header excluded.
    snapshot: Vec<Candidate>,
    projections: Vec<Projection>,
}

impl<S: RecordStore> SyncEngine<S> {
    pub fn new(store: S, intake_sheet: String, tracked_sheet: String) -> Self {
        let projections = ProjectionKind::ALL
            .into_iter()
            .map(|kind| Projection {
                kind,
                rows: Vec::new(),
            })
            .collect();
        Self {
            store,
            intake_sheet,
            tracked_sheet,
            intake: Vec::new(),
            snapshot: Vec::new(),
            projections,
        }
    }

    pub fn tracked_sheet(&self) -> &str {
        &self.tracked_sheet
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> &[Candidate] {
        &self.snapshot
    }

    pub fn projection(&self, kind: ProjectionKind) -> &Projection {
        // ALL order matches construction order.
        &self.projections[ProjectionKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or(0)]
    }

    /// Looks a candidate up by its sheet row.
    pub fn find_row(&self, row: u32) -> Option<&Candidate> {
        self.snapshot.iter().find(|c| c.row == row)
    }

    /// Reads the full intake and tracked ranges.
    ///
    /// The existing snapshot is replaced only after both reads succeed;
    /// a failed pull leaves the engine stale but consistent.
    pub async fn pull(&mut self) -> Result<(), SheetsError> {
        let intake_range = format!(
            "{}!A:{}",
            self.intake_sheet,
            column_letter(col::INTAKE_WIDTH - 1)
        );
        let tracked_range = format!(
            "{}!A:{}",
            self.tracked_sheet,
            column_letter(col::TRACKED_WIDTH - 1)
        );
        let intake = self.store.read_range(&intake_range).await?;
        let tracked = self.store.read_range(&tracked_range).await?;

        self.intake = intake;
        self.snapshot = tracked
            .iter()
            .enumerate()
            .skip(1) // header row
            .map(|(i, cells)| Candidate::from_row(cells, (i + 1) as u32))
            .collect();
        Ok(())
    }

    /// Copies intake rows that have not been promoted yet into the tracked
    /// table, exactly once each.
    ///
    /// An intake row narrower than the full intake width has an empty copied
    /// flag and counts as new. The seeded tracked row clears the first cell
    /// (the host is unknown at promotion), pads out the intake width and
    /// appends the initial status literal. The intake row is then flagged so
    /// a re-run skips it.
    pub async fn promote_new_arrivals(&mut self) -> Result<usize, SheetsError> {
        let mut promoted = 0;
        let arrivals: Vec<(usize, Vec<String>)> = self
            .intake
            .iter()
            .enumerate()
            .skip(1) // header row
            .filter(|(_, row)| row.len() < col::INTAKE_WIDTH)
            .map(|(i, row)| (i, row.clone()))
            .collect();

        for (i, intake_row) in arrivals {
            let mut seeded = intake_row;
            if seeded.is_empty() {
                seeded.push(String::new());
            } else {
                seeded[0] = String::new();
            }
            while seeded.len() < col::INTAKE_WIDTH {
                seeded.push(String::new());
            }
            seeded.push(StatusWorkflow::INITIAL.as_cell().to_string());

            self.store.append_row(&self.tracked_sheet, &seeded).await?;

            let flag = CellAddress {
                sheet: self.intake_sheet.clone(),
                column: col::INTAKE_FLAG,
                row: (i + 1) as u32,
            };
            self.store.write_cell(&flag, "1").await?;
            promoted += 1;
        }
        Ok(promoted)
    }

    /// Partitions the snapshot into the four projections, each ordered by
    /// hosting date. Returns the date warnings collected along the way.
    pub fn rebuild_projections(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        self.projections = ProjectionKind::ALL
            .into_iter()
            .map(|kind| {
                let rows: Vec<Candidate> = self
                    .snapshot
                    .iter()
                    .filter(|c| c.status == kind.status())
                    .cloned()
                    .collect();
                let (rows, mut w) = dates::sort_by_hosting_date(rows);
                warnings.append(&mut w);
                Projection { kind, rows }
            })
            .collect();
        warnings
    }

    /// Pull, promote new arrivals, re-pull if anything was promoted, and
    /// rebuild the projections. The only path by which the snapshot
    /// advances; safe to invoke repeatedly.
    pub async fn refresh(&mut self) -> Result<SyncReport, SheetsError> {
        self.pull().await?;
        let promoted = self.promote_new_arrivals().await?;
        if promoted > 0 {
            self.pull().await?;
        }
        let warnings = self.rebuild_projections();
        let counts = [
            (ProjectionKind::Receipt, self.projection(ProjectionKind::Receipt).rows.len()),
            (ProjectionKind::Pairing, self.projection(ProjectionKind::Pairing).rows.len()),
            (ProjectionKind::Done, self.projection(ProjectionKind::Done).rows.len()),
            (ProjectionKind::Ignored, self.projection(ProjectionKind::Ignored).rows.len()),
        ];
        Ok(SyncReport {
            promoted,
            warnings,
            counts,
        })
    }
}
