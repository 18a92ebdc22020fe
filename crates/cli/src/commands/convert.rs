//! `convert` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ConvertArgs;
use crate::pipeline::{resolve_config, Pipeline, PipelineOptions};

/// Execute the `convert` command
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let config = resolve_config(&args.pipeline).context("Failed to load configuration")?;
    let options = PipelineOptions::from_args(&args.pipeline, args.profile, args.rig);
    let pipeline = Pipeline::new(config, options);

    let report = pipeline
        .run_file(&args.input)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    info!(
        source = %report.source,
        rows = report.rows,
        samples = report.samples,
        warnings = report.warnings.len(),
        outputs = ?report.delivered,
        "Conversion completed successfully"
    );
    Ok(())
}
