use std::path::PathBuf;

use registry_catalog::SchemaError;
use thiserror::Error;

use crate::normalize::NormalizeError;

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Source unreadable or output unwritable
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed delimited input
    #[error("CSV parse error at line {line}: {source}")]
    Csv { line: u64, source: csv::Error },

    /// A data row with more fields than the header names
    #[error("Malformed row at line {line}: {found} fields, header has {expected}")]
    RowTooLong {
        line: u64,
        found: usize,
        expected: usize,
    },

    /// The schema itself is inconsistent
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// The schema reads fields the source header does not provide
    #[error("Source header is missing field(s) required by {table}: {}", .fields.join(", "))]
    MissingFields { table: String, fields: Vec<String> },

    /// A row failed under the abort policy
    #[error("{0}")]
    Record(#[from] RecordError),

    /// Options that cannot work with the chosen schema
    #[error("Config error: {0}")]
    Config(String),
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// A single source row that could not be turned into a statement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("row {row}: {cause}")]
pub struct RecordError {
    /// Line number of the row in the source file.
    pub row: u64,
    pub cause: RecordErrorCause,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordErrorCause {
    #[error("column {column}: {source}")]
    Invalid {
        column: String,
        source: NormalizeError,
    },
    #[error("natural key ({}) is empty; cannot derive a stable id", .fields.join(", "))]
    EmptyNaturalKey { fields: Vec<String> },
    #[error("identifier {0} was already issued in this run")]
    DuplicateId(String),
}

impl RecordError {
    pub fn new(row: u64, cause: RecordErrorCause) -> Self {
        Self { row, cause }
    }

    pub fn invalid(row: u64, column: &str, source: NormalizeError) -> Self {
        Self::new(
            row,
            RecordErrorCause::Invalid {
                column: column.to_string(),
                source,
            },
        )
    }
}
