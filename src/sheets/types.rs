//! Addressing and wire types for the record store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Converts a 0-based column position to its letter form: `A`..`Z`, `AA`...
pub fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Absolute address of a single cell, e.g. `Sheet2!M7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    pub sheet: String,
    /// 0-based column position.
    pub column: usize,
    /// 1-based sheet row.
    pub row: u32,
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", self.sheet, column_letter(self.column), self.row)
    }
}

/// A pending single-cell write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub address: CellAddress,
    pub value: String,
}

/// Body of a values read/write exchange with the store API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}
