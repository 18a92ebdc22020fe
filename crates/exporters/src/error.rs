//! Exporter error types

use contracts::MotionError;
use thiserror::Error;

/// Exporter-specific errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Encoder failure
    #[error("{format} encode error: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    /// CSV writer error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn encode(format: &'static str, message: impl Into<String>) -> Self {
        Self::Encode {
            format,
            message: message.into(),
        }
    }

    /// Attach a sink name, producing the shared error taxonomy
    pub fn into_motion(self, sink_name: &str) -> MotionError {
        MotionError::export(sink_name, self.to_string())
    }
}
