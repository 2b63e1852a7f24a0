// ⚠️ Error types for the BioMuta ingest pipeline
// Every fatal condition of the load surfaces here instead of aborting the process

use thiserror::Error;

use crate::hgvs::HgvsError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header does not have the shape the mapper expects
    #[error("Schema error: {0}")]
    Schema(String),

    /// Cross-field consistency failure inside one row
    #[error("Data integrity error at line {line}: {message}")]
    DataIntegrity { line: u64, message: String },

    #[error("Invalid chromosome position {value:?} at line {line}")]
    InvalidPosition { line: u64, value: String },

    #[error("Cannot build HGVS id at line {line}: {source}")]
    Hgvs {
        line: u64,
        #[source]
        source: HgvsError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
