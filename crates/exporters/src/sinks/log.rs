//! LogSink - logs a sequence summary via tracing

use contracts::{MotionError, MotionSample, MotionSink, RecordLayout};
use tracing::{info, instrument};

/// Sink that logs sequence summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_summary(&self, samples: &[MotionSample]) {
        let layout = RecordLayout::from_samples(samples);
        let axes: Vec<String> = layout.rotation_axes.iter().map(ToString::to_string).collect();

        info!(
            sink = %self.name,
            samples = samples.len(),
            first_frame = samples.first().map(|s| s.frame),
            last_frame = samples.last().map(|s| s.frame),
            rotation_axes = %axes.join(""),
            extras = layout.extra_columns.len(),
            "motion sequence received"
        );
    }
}

impl MotionSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_write", skip(self, samples), fields(sink = %self.name))]
    fn write(&mut self, samples: &[MotionSample]) -> Result<(), MotionError> {
        self.log_summary(samples);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MotionError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    fn close(&mut self) -> Result<(), MotionError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
