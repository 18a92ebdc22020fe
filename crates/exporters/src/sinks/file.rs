//! FileSink - encodes samples and writes them to disk

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{ExportFormat, MotionError, MotionSample, MotionSink};
use tracing::{debug, error, instrument};

use crate::error::ExportError;
use crate::formats::{serialize_with, EncodeOptions};

/// Sink that writes one file per sample sequence
pub struct FileSink {
    name: String,
    path: PathBuf,
    format: ExportFormat,
    options: EncodeOptions,
    bytes_written: u64,
}

impl FileSink {
    /// Create a new FileSink; the parent directory is created if missing
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        format: ExportFormat,
        options: EncodeOptions,
    ) -> Result<Self, ExportError> {
        let name = name.into();
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ExportError::sink_creation(&name, format!("{}: {e}", parent.display())))?;
        }
        Ok(Self {
            name,
            path,
            format,
            options,
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn persist(&mut self, samples: &[MotionSample]) -> Result<(), ExportError> {
        let bytes = serialize_with(samples, self.format, &self.options)?;
        fs::write(&self.path, &bytes)?;
        self.bytes_written += bytes.len() as u64;
        ::metrics::counter!("hve_motion_bytes_exported_total", "format" => self.format.label())
            .increment(bytes.len() as u64);
        Ok(())
    }
}

impl MotionSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, samples),
        fields(sink = %self.name, samples = samples.len())
    )]
    fn write(&mut self, samples: &[MotionSample]) -> Result<(), MotionError> {
        self.persist(samples).map_err(|e| {
            error!(sink = %self.name, path = %self.path.display(), error = %e, "Write failed");
            e.into_motion(&self.name)
        })?;
        debug!(path = %self.path.display(), bytes = self.bytes_written, "file written");
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MotionError> {
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    fn close(&mut self) -> Result<(), MotionError> {
        debug!(sink = %self.name, "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.h3d");
        let mut sink =
            FileSink::new("h3d_out", &path, ExportFormat::H3d, EncodeOptions::default()).unwrap();

        sink.write(&[MotionSample::new(0, 0.0)]).unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("DEF Motion_0"));
        assert_eq!(sink.bytes_written(), text.len() as u64);
    }

    #[test]
    fn test_file_sink_write_failure_names_sink() {
        let dir = tempdir().unwrap();
        // A directory in place of the file makes the write fail
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        let mut sink =
            FileSink::new("csv_out", &path, ExportFormat::Csv, EncodeOptions::default()).unwrap();

        let err = sink.write(&[]).unwrap_err();
        match err {
            MotionError::Export { sink_name, .. } => assert_eq!(sink_name, "csv_out"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
