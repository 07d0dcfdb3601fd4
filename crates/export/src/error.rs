use ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backup could not be restored: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Backup format version {0} is not supported")]
    UnsupportedVersion(u32),
}
