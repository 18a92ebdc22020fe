//! Layered error definitions
//!
//! Categorized by stage: config / parse / timeline / export.
//! Parse and timeline errors are fatal for the file being processed only.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum MotionError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Parse Errors =====
    /// A data row disagrees with the header or carries an unparseable field
    #[error("malformed row {row}{}: {message}", column_suffix(.column))]
    MalformedRow {
        /// 1-based line number in the source text
        row: u64,
        column: Option<String>,
        message: String,
    },

    /// Input contained no data rows
    #[error("empty input: '{source_name}' has no data rows")]
    EmptyInput { source_name: String },

    // ===== Timeline Errors =====
    /// No time or frame-index column to build a timeline from
    #[error("no timebase: none of the columns {available:?} is a time or frame-index column")]
    NoTimebase { available: Vec<String> },

    /// Channel with zero samples used where values are required
    #[error("empty channel: '{channel}' has no samples")]
    EmptyChannel { channel: String },

    /// Caller supplied an argument outside the accepted domain
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    // ===== Export Errors =====
    /// Exporter failed to encode or persist output
    #[error("export '{sink_name}' error: {message}")]
    Export { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MotionError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create malformed row error
    pub fn malformed_row(row: u64, column: Option<&str>, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            column: column.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create empty input error
    pub fn empty_input(source_name: impl Into<String>) -> Self {
        Self::EmptyInput {
            source_name: source_name.into(),
        }
    }

    /// Create empty channel error
    pub fn empty_channel(channel: impl Into<String>) -> Self {
        Self::EmptyChannel {
            channel: channel.into(),
        }
    }

    /// Create invalid argument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create export error
    pub fn export(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Export {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts only the file being processed
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::MalformedRow { .. }
                | Self::EmptyInput { .. }
                | Self::NoTimebase { .. }
                | Self::EmptyChannel { .. }
        )
    }
}

fn column_suffix(column: &Option<String>) -> String {
    column
        .as_ref()
        .map(|c| format!(" (column '{c}')"))
        .unwrap_or_default()
}

/// Result alias used across the pipeline crates
pub type Result<T> = std::result::Result<T, MotionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_row_message_names_column() {
        let err = MotionError::malformed_row(7, Some("pitch"), "not a number: 'abc'");
        let text = err.to_string();
        assert!(text.contains("row 7"));
        assert!(text.contains("'pitch'"));
        assert!(text.contains("abc"));
    }

    #[test]
    fn test_malformed_row_without_column() {
        let err = MotionError::malformed_row(3, None, "expected 4 fields, got 2");
        assert_eq!(err.to_string(), "malformed row 3: expected 4 fields, got 2");
    }

    #[test]
    fn test_per_file_classification() {
        assert!(MotionError::empty_input("a.csv").is_per_file());
        assert!(MotionError::empty_channel("yaw").is_per_file());
        assert!(!MotionError::config_parse("bad").is_per_file());
    }
}
