//! # Exporters
//!
//! Encoders for generic CSV, RaceRender and H3D motion blocks, plus the
//! dispatcher that hands one sample sequence to every configured output.
//! An output that fails is reported; the rest still get written.

pub mod dispatcher;
pub mod error;
pub mod formats;
pub mod metrics;
pub mod sinks;

pub use contracts::{ExportFormat, MotionSink};
pub use dispatcher::{resolve_output_path, DispatchReport, Dispatcher};
pub use error::ExportError;
pub use formats::{
    clean_def, encode_variable_output, racerender_file_name, serialize, serialize_with,
    write_variable_output, EncodeOptions, DEFAULT_OBJECT_NAME,
};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, LogSink};
