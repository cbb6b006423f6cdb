use thiserror::Error;

use crate::diff::ProjectionKind;
use crate::mailer::MailerError;
use crate::sheets::SheetsError;
use crate::workflow::TransitionError;

#[derive(Debug, Error)]
pub enum HostbookError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[from] SheetsError),

    #[error("message transport failure: {0}")]
    Transport(#[from] MailerError),

    /// Contract violation in the view column mapping. Should never occur with
    /// working rows produced by this program.
    #[error("column {column} is not mapped for the {kind} view")]
    InvalidColumn { kind: ProjectionKind, column: usize },

    #[error("sheet row {0} is not in the tracked table")]
    RowNotFound(u32),

    #[error("status transition error: {0}")]
    Workflow(#[from] TransitionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
