//! Pipeline metrics collection
//!
//! Facade metrics are recorded per processed file; `PipelineMetricsAggregator`
//! keeps an in-memory summary for the end of a run.

use std::collections::BTreeMap;

use contracts::BindingWarning;
use metrics::{counter, histogram};

/// Result of running the pipeline on one input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOutcome {
    pub source: String,
    pub rows: usize,
    pub samples: usize,
    /// Warning kinds raised by axis inference
    pub warning_kinds: Vec<&'static str>,
    pub elapsed_ms: f64,
    /// Error message when the file failed
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Record one finished file
pub fn record_file_processed(outcome: &FileOutcome) {
    let status = if outcome.is_success() { "ok" } else { "failed" };
    counter!("hve_motion_files_processed_total", "status" => status).increment(1);
    histogram!("hve_motion_file_duration_ms").record(outcome.elapsed_ms);
}

/// Record binding warnings by kind
pub fn record_binding_warnings(warnings: &[BindingWarning]) {
    for warning in warnings {
        counter!("hve_motion_binding_warnings_total", "kind" => warning.kind()).increment(1);
    }
}

/// Record one output delivery
pub fn record_output(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "hve_motion_outputs_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record the duration of one pipeline stage
pub fn record_stage_latency_ms(stage: &'static str, latency_ms: f64) {
    histogram!("hve_motion_stage_latency_ms", "stage" => stage).record(latency_ms);
}

/// Pipeline metrics aggregator
///
/// Aggregates in memory for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct PipelineMetricsAggregator {
    pub total_files: u64,
    pub failed_files: u64,
    pub total_rows: u64,
    pub total_samples: u64,

    /// Rows per successful file
    pub rows_stats: RunningStats,

    /// Processing time per file (ms)
    pub latency_stats: RunningStats,

    /// Binding warnings by kind
    pub warning_counts: BTreeMap<&'static str, u64>,

    /// (source, error) of failed files
    pub failures: Vec<(String, String)>,
}

impl PipelineMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, outcome: &FileOutcome) {
        self.total_files += 1;
        self.latency_stats.push(outcome.elapsed_ms);

        if let Some(error) = &outcome.error {
            self.failed_files += 1;
            self.failures.push((outcome.source.clone(), error.clone()));
            return;
        }

        self.total_rows += outcome.rows as u64;
        self.total_samples += outcome.samples as u64;
        self.rows_stats.push(outcome.rows as f64);
        for kind in &outcome.warning_kinds {
            *self.warning_counts.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_files: self.total_files,
            failed_files: self.failed_files,
            total_rows: self.total_rows,
            total_samples: self.total_samples,
            failure_rate: if self.total_files > 0 {
                self.failed_files as f64 / self.total_files as f64 * 100.0
            } else {
                0.0
            },
            rows_per_file: StatsSummary::from(&self.rows_stats),
            latency_ms: StatsSummary::from(&self.latency_stats),
            warning_counts: self.warning_counts.clone(),
            failures: self.failures.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub total_files: u64,
    pub failed_files: u64,
    pub total_rows: u64,
    pub total_samples: u64,
    pub failure_rate: f64,
    pub rows_per_file: StatsSummary,
    pub latency_ms: StatsSummary,
    pub warning_counts: BTreeMap<&'static str, u64>,
    pub failures: Vec<(String, String)>,
}

impl std::fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Pipeline Summary ===")?;
        writeln!(f, "Files: {}", self.total_files)?;
        writeln!(
            f,
            "Failed: {} ({:.2}%)",
            self.failed_files, self.failure_rate
        )?;
        writeln!(f, "Rows: {}", self.total_rows)?;
        writeln!(f, "Samples: {}", self.total_samples)?;
        writeln!(f, "Rows per file: {}", self.rows_per_file)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.warning_counts.is_empty() {
            writeln!(f, "Binding warnings:")?;
            for (kind, count) in &self.warning_counts {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }
        if !self.failures.is_empty() {
            writeln!(f, "Failures:")?;
            for (source, error) in &self.failures {
                writeln!(f, "  {}: {}", source, error)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
