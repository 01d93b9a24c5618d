//! Error types for the gateway comparison system

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A raw numeric field could not be read as a finite number.
    #[error("Invalid numeric input: {0:?}")]
    InvalidNumericInput(String),

    /// A registry record could not be decoded, or lacks its address.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The registry call failed or answered with a non-success status.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
