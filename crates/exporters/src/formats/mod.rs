//! Motion encoders
//!
//! Each format has a fixed column order:
//! - csv: `frame, time (s), x (m), y (m), z (m), rot_x/y/z (rad)..., extras...`
//! - racerender: `Time (sec), Frame, X (m), Y (m), Z (m), Roll/Pitch/Yaw (deg)..., extras...`
//! - h3d: one Inventor `Transform` block per sample
//!
//! Rotation columns appear only for axes some sample drives.

mod csv_generic;
mod h3d;
mod racerender;

use bytes::Bytes;
use contracts::{ExportFormat, MotionSample};
use tracing::debug;

use crate::error::ExportError;

pub use h3d::clean_def;
pub use racerender::{
    encode_variable_output, racerender_file_name, write_variable_output, RACERENDER_EXCLUDED,
};

/// Transform name used when none is configured
pub const DEFAULT_OBJECT_NAME: &str = "Motion";

/// Per-output encoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Transform name written into H3D blocks
    pub object_name: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            object_name: DEFAULT_OBJECT_NAME.to_string(),
        }
    }
}

/// Serialize samples with default options
pub fn serialize(samples: &[MotionSample], format: ExportFormat) -> Result<Bytes, ExportError> {
    serialize_with(samples, format, &EncodeOptions::default())
}

/// Serialize samples into one complete document
pub fn serialize_with(
    samples: &[MotionSample],
    format: ExportFormat,
    options: &EncodeOptions,
) -> Result<Bytes, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => csv_generic::encode(samples)?,
        ExportFormat::Racerender => racerender::encode_samples(samples)?,
        ExportFormat::H3d => h3d::encode(samples, &options.object_name),
    };
    debug!(
        format = format.label(),
        samples = samples.len(),
        bytes = bytes.len(),
        "serialized motion"
    );
    Ok(bytes)
}

/// Shortest text that parses back to the same value
fn fmt_value(value: f64) -> String {
    format!("{value:?}")
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map(fmt_value).unwrap_or_default()
}

fn finish_csv(writer: csv::Writer<Vec<u8>>, format: &'static str) -> Result<Bytes, ExportError> {
    writer
        .into_inner()
        .map(Bytes::from)
        .map_err(|e| ExportError::encode(format, e.to_string()))
}
