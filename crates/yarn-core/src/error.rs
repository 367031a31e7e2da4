//! Errors shared across yarn-lsp crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum YarnError {
    #[error("Invalid definitions file {file}: {source}")]
    InvalidDefinitions {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("File too large: {size} bytes (max: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Invalid string table entry for node {node}: {message}")]
    InvalidStringTableEntry { node: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YarnError>;
