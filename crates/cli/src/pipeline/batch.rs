//! Batch runner - many files on blocking worker tasks.
//!
//! Each file is an independent pipeline run; a failed file is recorded and the
//! rest continue.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use observability::{record_file_processed, FileOutcome, PipelineMetricsAggregator};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::Pipeline;
use crate::error::Result;

/// Expand directories into their `.csv` files; files are kept as given
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_csv(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Run every file, at most `jobs` at once, and aggregate the outcomes
pub async fn run_batch(
    pipeline: Arc<Pipeline>,
    files: Vec<PathBuf>,
    jobs: usize,
) -> PipelineMetricsAggregator {
    let limit = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let pipeline = Arc::clone(&pipeline);
        let limit = Arc::clone(&limit);
        tasks.spawn(async move {
            // The semaphore is never closed
            let _permit = limit.acquire_owned().await.ok();
            let source = path.display().to_string();
            tokio::task::spawn_blocking(move || process_file(&pipeline, &path))
                .await
                .unwrap_or_else(|e| FileOutcome {
                    source,
                    error: Some(format!("worker failed: {e}")),
                    ..Default::default()
                })
        });
    }

    let mut aggregator = PipelineMetricsAggregator::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => {
                record_file_processed(&outcome);
                aggregator.update(&outcome);
            }
            Err(e) => warn!(error = %e, "batch task aborted"),
        }
    }

    info!(
        files = aggregator.total_files,
        failed = aggregator.failed_files,
        "Batch complete"
    );
    aggregator
}

/// Run one file and turn the result into an outcome
pub fn process_file(pipeline: &Pipeline, path: &Path) -> FileOutcome {
    let started = Instant::now();
    let result = pipeline.run_file(path);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(report) => {
            info!(
                source = %report.source,
                rows = report.rows,
                samples = report.samples,
                outputs = report.delivered.len(),
                "File converted"
            );
            report.outcome(elapsed_ms)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "File failed");
            FileOutcome {
                source: path.display().to_string(),
                elapsed_ms,
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}
