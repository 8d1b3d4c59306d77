use registry_catalog::SchemaFileError;
use registry_import::ImportError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Import pipeline failed
    #[error("{0}")]
    Import(#[from] ImportError),

    /// Custom schema file could not be loaded
    #[error("{0}")]
    Schema(#[from] SchemaFileError),

    /// Missing or unusable command-line argument
    #[error("{0}")]
    Usage(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
