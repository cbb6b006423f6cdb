//! The four-state hosting status machine.
//!
//! Each tracked candidate flows through: receipt pending → pairing pending →
//! paired, with an ignore list reachable from (and reversible to) any state
//! by manual override. Automatic advancement happens only as the side effect
//! of a successfully delivered notification; both the automatic and the
//! manual path funnel through [`StatusWorkflow::transition`], which yields
//! the single status-cell write to apply.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::col;
use crate::sheets::{CellAddress, CellWrite};

/// Hosting status of a tracked candidate.
///
/// Persisted in the status column as the ASCII digits `"0"`..`"3"`; the
/// digit encoding exists only at the record-store boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Request arrived, receipt confirmation not yet sent.
    #[default]
    ReceiptPending,
    /// Receipt confirmed, waiting for a host to be assigned and announced.
    PairingPending,
    /// Host announced; the request is complete.
    Paired,
    /// Removed from the active flow (duplicate or cancelled request).
    Ignored,
}

impl Status {
    /// The digit literal stored in the status cell.
    pub fn as_cell(self) -> &'static str {
        match self {
            Status::ReceiptPending => "0",
            Status::PairingPending => "1",
            Status::Paired => "2",
            Status::Ignored => "3",
        }
    }

    /// Decodes a status cell. `None` for anything but the four digit
    /// literals; callers treat that as a newly arrived row.
    pub fn from_cell(value: &str) -> Option<Status> {
        match value.trim() {
            "0" => Some(Status::ReceiptPending),
            "1" => Some(Status::PairingPending),
            "2" => Some(Status::Paired),
            "3" => Some(Status::Ignored),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::ReceiptPending => write!(f, "Awaiting Receipt Confirmation"),
            Status::PairingPending => write!(f, "Awaiting Host Pairing"),
            Status::Paired => write!(f, "Paired with Host"),
            Status::Ignored => write!(f, "Ignored"),
        }
    }
}

/// What caused a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A notification for this candidate was delivered successfully.
    Delivered,
    /// An explicit operator action.
    Manual,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no automatic transition from \"{from}\" to \"{to}\"")]
    NotAutomatic { from: Status, to: Status },
}

/// Drives status changes for tracked candidates.
pub struct StatusWorkflow;

impl StatusWorkflow {
    /// Status assigned to a freshly promoted intake row.
    pub const INITIAL: Status = Status::ReceiptPending;

    /// The state a successful delivery advances to, if any.
    ///
    /// A receipt confirmation advances the candidate into the pairing queue;
    /// a pairing announcement completes the request. `Paired` and `Ignored`
    /// have no notification attached and never advance automatically.
    pub fn next_on_delivery(current: Status) -> Option<Status> {
        match current {
            Status::ReceiptPending => Some(Status::PairingPending),
            Status::PairingPending => Some(Status::Paired),
            Status::Paired | Status::Ignored => None,
        }
    }

    /// Validates a status change and returns the status-cell write that
    /// records it.
    ///
    /// Delivery-triggered changes are only valid along the two notification
    /// edges. Manual overrides may move any state to any state.
    pub fn transition(
        tracked_sheet: &str,
        sheet_row: u32,
        from: Status,
        to: Status,
        trigger: Trigger,
    ) -> Result<CellWrite, TransitionError> {
        if trigger == Trigger::Delivered && Self::next_on_delivery(from) != Some(to) {
            return Err(TransitionError::NotAutomatic { from, to });
        }
        Ok(CellWrite {
            address: CellAddress {
                sheet: tracked_sheet.to_string(),
                column: col::STATUS,
                row: sheet_row,
            },
            value: to.as_cell().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_encoding_roundtrip() {
        for status in [
            Status::ReceiptPending,
            Status::PairingPending,
            Status::Paired,
            Status::Ignored,
        ] {
            assert_eq!(Status::from_cell(status.as_cell()), Some(status));
        }
    }

    #[test]
    fn unknown_cell_values_decode_to_none() {
        assert_eq!(Status::from_cell(""), None);
        assert_eq!(Status::from_cell("4"), None);
        assert_eq!(Status::from_cell("paired"), None);
        assert_eq!(Status::from_cell(" 1 "), Some(Status::PairingPending));
    }

    #[test]
    fn delivery_advances_along_notification_edges() {
        assert_eq!(
            StatusWorkflow::next_on_delivery(Status::ReceiptPending),
            Some(Status::PairingPending)
        );
        assert_eq!(
            StatusWorkflow::next_on_delivery(Status::PairingPending),
            Some(Status::Paired)
        );
        assert_eq!(StatusWorkflow::next_on_delivery(Status::Paired), None);
        assert_eq!(StatusWorkflow::next_on_delivery(Status::Ignored), None);
    }

    #[test]
    fn receipt_delivery_writes_a_one() {
        let write = StatusWorkflow::transition(
            "Sheet2",
            7,
            Status::ReceiptPending,
            Status::PairingPending,
            Trigger::Delivered,
        )
        .unwrap();
        assert_eq!(write.address.to_string(), "Sheet2!M7");
        assert_eq!(write.value, "1");
    }

    #[test]
    fn pairing_delivery_writes_a_two() {
        let write = StatusWorkflow::transition(
            "Sheet2",
            12,
            Status::PairingPending,
            Status::Paired,
            Trigger::Delivered,
        )
        .unwrap();
        assert_eq!(write.address.to_string(), "Sheet2!M12");
        assert_eq!(write.value, "2");
    }

    #[test]
    fn delivery_cannot_skip_states() {
        let result = StatusWorkflow::transition(
            "Sheet2",
            7,
            Status::ReceiptPending,
            Status::Paired,
            Trigger::Delivered,
        );
        assert_eq!(
            result,
            Err(TransitionError::NotAutomatic {
                from: Status::ReceiptPending,
                to: Status::Paired,
            })
        );
    }

    #[test]
    fn manual_override_reaches_any_state() {
        // Ignored is reversible only through an explicit operator action.
        let write = StatusWorkflow::transition(
            "Sheet2",
            9,
            Status::Ignored,
            Status::ReceiptPending,
            Trigger::Manual,
        )
        .unwrap();
        assert_eq!(write.address.to_string(), "Sheet2!M9");
        assert_eq!(write.value, "0");

        let write =
            StatusWorkflow::transition("Sheet2", 9, Status::Paired, Status::Ignored, Trigger::Manual)
                .unwrap();
        assert_eq!(write.value, "3");
    }

    #[test]
    fn initial_state() {
        assert_eq!(StatusWorkflow::INITIAL, Status::ReceiptPending);
    }
}
