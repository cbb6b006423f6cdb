//! The tracked candidate record and the column layout of the backing tables.

use serde::{Deserialize, Serialize};

use crate::workflow::Status;

/// Column positions in the backing tables (0-based).
///
/// The tracked table holds one row per candidate in columns A..M; the intake
/// table holds the raw form submissions in columns A..L, with the last column
/// acting as the copied flag set at promotion. These constants must match the
/// live sheet layout.
pub mod col {
    pub const HOST_NAME: usize = 0;
    pub const CANDIDATE_NAME: usize = 1;
    pub const GENDER: usize = 2;
    pub const INTERVIEW_DATE: usize = 3;
    pub const HOSTING_DATE: usize = 4;
    pub const EMAIL: usize = 5;
    pub const PHONE: usize = 6;
    pub const UNDERGRAD: usize = 7;
    pub const PREFERRED_HOST_GENDER: usize = 8;
    pub const ALLERGIES: usize = 9;
    pub const INTEREST_GROUPS: usize = 10;
    pub const HOST_EMAIL: usize = 11;
    pub const STATUS: usize = 12;

    /// Width of a complete tracked-table row (A..M).
    pub const TRACKED_WIDTH: usize = 13;
    /// Width of a complete intake row (A..L), copied flag included.
    pub const INTAKE_WIDTH: usize = 12;
    /// Position of the copied flag in an intake row.
    pub const INTAKE_FLAG: usize = 11;
}

/// Display titles for the candidate preference fields (columns B..K), used in
/// detail views and the HTML preference table.
pub const FIELD_NAMES: [&str; 10] = [
    "Candidate Name",
    "Candidate Gender",
    "Interview Date",
    "Hosting Date",
    "Candidate Email",
    "Candidate Phone",
    "Undergraduate School",
    "Preferred Host Gender",
    "Allergies",
    "Interest Groups",
];

/// One row of the tracked table.
///
/// `row` is the 1-based sheet row the record was read from. It is the stable
/// identity key for every write-back and never changes once assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub host_name: String,
    pub name: String,
    pub gender: String,
    pub interview_date: String,
    pub hosting_date: String,
    pub email: String,
    pub phone: String,
    pub undergrad: String,
    pub preferred_host_gender: String,
    pub allergies: String,
    pub interest_groups: String,
    pub host_email: String,
    pub status: Status,
    pub row: u32,
}

impl Candidate {
    /// Builds a candidate from a raw tracked-table row.
    ///
    /// Short rows are padded with empty cells. A missing or unrecognized
    /// status literal means the row just arrived and defaults to the initial
    /// state.
    pub fn from_row(cells: &[String], row: u32) -> Self {
        let cell = |i: usize| cells.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        let status = cells
            .get(col::STATUS)
            .and_then(|s| Status::from_cell(s))
            .unwrap_or(Status::ReceiptPending);

        Candidate {
            host_name: cell(col::HOST_NAME),
            name: cell(col::CANDIDATE_NAME),
            gender: cell(col::GENDER),
            interview_date: cell(col::INTERVIEW_DATE),
            hosting_date: cell(col::HOSTING_DATE),
            email: cell(col::EMAIL),
            phone: cell(col::PHONE),
            undergrad: cell(col::UNDERGRAD),
            preferred_host_gender: cell(col::PREFERRED_HOST_GENDER),
            allergies: cell(col::ALLERGIES),
            interest_groups: cell(col::INTEREST_GROUPS),
            host_email: cell(col::HOST_EMAIL),
            status,
            row,
        }
    }

    /// The value of a data column by tracked-table position. `None` for the
    /// status column and anything past it; status is written only through the
    /// workflow.
    pub fn field(&self, column: usize) -> Option<&str> {
        match column {
            col::HOST_NAME => Some(&self.host_name),
            col::CANDIDATE_NAME => Some(&self.name),
            col::GENDER => Some(&self.gender),
            col::INTERVIEW_DATE => Some(&self.interview_date),
            col::HOSTING_DATE => Some(&self.hosting_date),
            col::EMAIL => Some(&self.email),
            col::PHONE => Some(&self.phone),
            col::UNDERGRAD => Some(&self.undergrad),
            col::PREFERRED_HOST_GENDER => Some(&self.preferred_host_gender),
            col::ALLERGIES => Some(&self.allergies),
            col::INTEREST_GROUPS => Some(&self.interest_groups),
            col::HOST_EMAIL => Some(&self.host_email),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> Vec<String> {
        vec![
            "Dana Host", "Alex Doe", "F", "03/01/2024", "03/02/2024",
            "alex@example.edu", "555-0100", "State College", "No preference",
            "peanuts", "surgery", "dana@example.edu", "1",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn from_row_reads_all_columns() {
        let c = Candidate::from_row(&full_row(), 7);
        assert_eq!(c.host_name, "Dana Host");
        assert_eq!(c.name, "Alex Doe");
        assert_eq!(c.hosting_date, "03/02/2024");
        assert_eq!(c.email, "alex@example.edu");
        assert_eq!(c.host_email, "dana@example.edu");
        assert_eq!(c.status, Status::PairingPending);
        assert_eq!(c.row, 7);
    }

    #[test]
    fn short_row_pads_and_defaults_status() {
        let cells: Vec<String> = vec!["".into(), "Alex Doe".into()];
        let c = Candidate::from_row(&cells, 3);
        assert_eq!(c.name, "Alex Doe");
        assert_eq!(c.hosting_date, "");
        assert_eq!(c.host_email, "");
        assert_eq!(c.status, Status::ReceiptPending);
    }

    #[test]
    fn unrecognized_status_defaults_to_initial() {
        let mut cells = full_row();
        cells[col::STATUS] = "pending".into();
        let c = Candidate::from_row(&cells, 4);
        assert_eq!(c.status, Status::ReceiptPending);
    }

    #[test]
    fn field_maps_data_columns() {
        let c = Candidate::from_row(&full_row(), 7);
        assert_eq!(c.field(col::HOST_NAME), Some("Dana Host"));
        assert_eq!(c.field(col::HOSTING_DATE), Some("03/02/2024"));
        assert_eq!(c.field(col::HOST_EMAIL), Some("dana@example.edu"));
        assert_eq!(c.field(col::STATUS), None);
        assert_eq!(c.field(42), None);
    }

    #[test]
    fn cells_are_trimmed() {
        let cells: Vec<String> = vec![" Dana ".into(), " Alex Doe ".into()];
        let c = Candidate::from_row(&cells, 2);
        assert_eq!(c.host_name, "Dana");
        assert_eq!(c.name, "Alex Doe");
    }
}
