//! Dispatcher - fans one sample sequence out to every configured output
//!
//! A failing sink is reported and counted; the remaining sinks still receive the
//! sequence.

use std::path::{Path, PathBuf};

use contracts::{MotionError, MotionSample, MotionSink, OutputConfig};
use tracing::{info, instrument, warn};

use crate::error::ExportError;
use crate::formats::{EncodeOptions, DEFAULT_OBJECT_NAME};
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::sinks::{FileSink, LogSink};

struct SinkEntry {
    sink: Box<dyn MotionSink>,
    metrics: SinkMetrics,
}

/// Outcome of one dispatch
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Sinks that accepted the sequence
    pub delivered: Vec<String>,
    /// Sinks that failed, with their error
    pub failed: Vec<(String, MotionError)>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The main Dispatcher that fans out sample sequences to sinks
pub struct Dispatcher {
    sinks: Vec<SinkEntry>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sinks (for testing)
    pub fn with_sinks(sinks: Vec<Box<dyn MotionSink>>) -> Self {
        Self {
            sinks: sinks
                .into_iter()
                .map(|sink| SinkEntry {
                    sink,
                    metrics: SinkMetrics::new(),
                })
                .collect(),
        }
    }

    /// Build sinks from output routes
    ///
    /// `stem` names files for outputs whose path is a directory. Outputs without
    /// a path log a summary instead of writing.
    #[instrument(name = "dispatcher_create", skip(outputs), fields(sink_count = outputs.len()))]
    pub fn from_outputs(outputs: &[OutputConfig], stem: &str) -> Result<Self, ExportError> {
        let mut sinks: Vec<Box<dyn MotionSink>> = Vec::with_capacity(outputs.len());
        for output in outputs {
            sinks.push(create_sink(output, stem)?);
        }
        Ok(Self::with_sinks(sinks))
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.sinks
            .iter()
            .map(|e| (e.sink.name().to_string(), e.metrics.snapshot()))
            .collect()
    }

    /// Deliver one complete sequence to every sink
    #[instrument(name = "dispatcher_dispatch", skip(self, samples), fields(samples = samples.len()))]
    pub fn dispatch(&mut self, samples: &[MotionSample]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for entry in &mut self.sinks {
            let name = entry.sink.name().to_string();
            let result = entry.sink.write(samples).and_then(|()| entry.sink.flush());
            match result {
                Ok(()) => {
                    entry.metrics.record_write(samples.len());
                    report.delivered.push(name);
                }
                Err(e) => {
                    warn!(sink = %name, error = %e, "sink failed");
                    entry.metrics.inc_failure_count();
                    report.failed.push((name, e));
                }
            }
        }
        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "dispatch complete"
        );
        report
    }

    /// Close every sink; close errors are logged
    pub fn shutdown(mut self) {
        for entry in &mut self.sinks {
            if let Err(e) = entry.sink.close() {
                warn!(sink = %entry.sink.name(), error = %e, "sink close failed");
            }
        }
    }
}

/// Target file of an output: directories get `{stem}_{name}.{ext}`
pub fn resolve_output_path(dir_or_file: &Path, stem: &str, output: &OutputConfig) -> PathBuf {
    if dir_or_file.is_dir() {
        dir_or_file.join(format!(
            "{stem}_{}.{}",
            output.name,
            output.format.extension()
        ))
    } else {
        dir_or_file.to_path_buf()
    }
}

fn create_sink(output: &OutputConfig, stem: &str) -> Result<Box<dyn MotionSink>, ExportError> {
    let Some(path) = output.path.as_deref() else {
        return Ok(Box::new(LogSink::new(&output.name)));
    };
    let options = EncodeOptions {
        object_name: output
            .object_name
            .clone()
            .unwrap_or_else(|| DEFAULT_OBJECT_NAME.to_string()),
    };
    let target = resolve_output_path(path, stem, output);
    Ok(Box::new(FileSink::new(
        &output.name,
        target,
        output.format,
        options,
    )?))
}
