//! Calendar-date parsing and chronological ordering for candidate rows.
//!
//! The record store keeps dates as plain `MM/dd/yyyy` strings. Everything that
//! needs chronological order goes through [`sort_by_hosting_date`], which sorts
//! the rows that carry a parseable hosting date and leaves the rest where they
//! are, reporting each bad date as a warning instead of failing the batch.

use chrono::NaiveDate;

use crate::record::Candidate;

/// The only accepted date layout: zero-padded month and day, four-digit year.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses a `MM/dd/yyyy` date string.
///
/// Returns `None` for anything that does not round-trip through the exact
/// format, so `3/1/2024` and `03-01-2024` are rejected even though chrono
/// would accept the former.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()?;
    (parsed.format(DATE_FORMAT).to_string() == trimmed).then_some(parsed)
}

/// Sorts candidates ascending by hosting date.
///
/// Rows whose hosting date does not parse are excluded from the reordering and
/// keep their original slot positions; each one produces a warning string for
/// the caller to surface. The sort is stable, so rows sharing a date keep
/// their relative order.
pub fn sort_by_hosting_date(rows: Vec<Candidate>) -> (Vec<Candidate>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut dated: Vec<(usize, NaiveDate)> = Vec::new();

    for (i, candidate) in rows.iter().enumerate() {
        match parse_date(&candidate.hosting_date) {
            Some(date) => dated.push((i, date)),
            None => warnings.push(format!(
                "\"{}\" is not a parseable date in MM/DD/YYYY format (sheet row {})",
                candidate.hosting_date, candidate.row
            )),
        }
    }

    // Slots that held a dated row, in original order. The sorted rows are
    // written back into exactly these positions.
    let slots: Vec<usize> = dated.iter().map(|&(i, _)| i).collect();
    let mut order = dated;
    order.sort_by_key(|&(_, date)| date);

    let mut result = rows;
    let sorted: Vec<Candidate> = order.iter().map(|&(i, _)| result[i].clone()).collect();
    for (slot, candidate) in slots.into_iter().zip(sorted) {
        result[slot] = candidate;
    }

    (result, warnings)
}
