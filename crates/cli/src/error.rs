//! Error types for CLI operations.

use contracts::MotionError;
use exporters::ExportError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Input file not found
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    /// Pipeline stage error
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// Output construction error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Some outputs of a file failed
    #[error("{failed} of {total} outputs failed for '{source_name}'")]
    OutputsFailed {
        source_name: String,
        failed: usize,
        total: usize,
    },

    /// Batch finished with failed files
    #[error("{failed} of {total} files failed")]
    BatchFailed { failed: u64, total: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
