//! Record-store collaborator: the spreadsheet holding intake submissions and
//! tracked candidates.

use std::future::Future;

pub mod client;
pub mod error;
pub mod types;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use types::{CellAddress, CellWrite, ValueRange, column_letter};

/// The operations the engine needs from the record store.
///
/// Ranges and addresses use the `<sheetName>!<columnLetter><rowNumber>`
/// convention with 1-based row numbers. Writing the same value to a cell
/// twice is a no-op in effect; the engine relies on that for idempotent
/// write-back.
pub trait RecordStore {
    /// Reads every populated row of the given range. Trailing empty cells of
    /// a row may be absent.
    fn read_range(
        &self,
        range: &str,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, SheetsError>> + Send;

    /// Writes a single cell.
    fn write_cell(
        &self,
        address: &CellAddress,
        value: &str,
    ) -> impl Future<Output = Result<(), SheetsError>> + Send;

    /// Appends a row after the last populated row of the sheet.
    fn append_row(
        &self,
        sheet: &str,
        row: &[String],
    ) -> impl Future<Output = Result<(), SheetsError>> + Send;
}
