use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("store API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("store request timed out")]
    Timeout,

    #[error("could not reach the record store: {0}")]
    Transport(String),

    #[error("failed to parse store response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SheetsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SheetsError::Timeout
        } else if err.is_decode() {
            SheetsError::Parse(err.to_string())
        } else {
            SheetsError::Transport(err.to_string())
        }
    }
}
