// ==========================================
// Vendas Ingest - ingestion error types
// ==========================================
// Tool: thiserror derive macro
//
// Taxonomy: file-level MalformedInput variants abort a run;
// everything row-level is recovered inside the pipeline and
// only surfaces through the report counters.
// ==========================================

use crate::store::error::StoreError;
use thiserror::Error;

/// Ingestion error type
#[derive(Error, Debug)]
pub enum IngestError {
    // ===== File-level errors (fatal, abort the run) =====
    #[error("empty upload: {0} has no ledger rows")]
    EmptyFile(String),

    #[error("no known branch name found in filename: {0}")]
    StoreNotIdentified(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("ledger parse failed: {0}")]
    CsvParseError(String),

    // ===== Field-level errors (recovered via documented fallback) =====
    #[error("unparsable date token: {value}")]
    UnparsableDate { value: String },

    // ===== Record-store errors =====
    #[error(transparent)]
    Storage(#[from] StoreError),

    // ===== Generic errors =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::CsvParseError(err.to_string())
    }
}

/// Result type alias
pub type IngestResult<T> = Result<T, IngestError>;
