//! `batch` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::BatchArgs;
use crate::error::CliError;
use crate::pipeline::{collect_inputs, resolve_config, run_batch, Pipeline, PipelineOptions};

/// Execute the `batch` command
pub async fn run_batch_command(args: &BatchArgs) -> Result<()> {
    let config = resolve_config(&args.pipeline).context("Failed to load configuration")?;
    let files = collect_inputs(&args.inputs).context("Failed to list inputs")?;
    if files.is_empty() {
        warn!("No input files found");
        return Ok(());
    }

    let jobs = if args.jobs == 0 {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        args.jobs
    };
    info!(files = files.len(), jobs, "Starting batch");

    let options = PipelineOptions::from_args(&args.pipeline, args.profile, args.rig);
    let pipeline = Arc::new(Pipeline::new(config, options));

    let aggregator = tokio::select! {
        aggregator = run_batch(pipeline, files, jobs) => aggregator,
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping batch...");
            anyhow::bail!("Batch interrupted");
        }
    };

    let summary = aggregator.summary();
    println!("{}", summary);

    if summary.failed_files > 0 {
        return Err(CliError::BatchFailed {
            failed: summary.failed_files,
            total: summary.total_files,
        }
        .into());
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM; never resolves when no handler can be installed
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
