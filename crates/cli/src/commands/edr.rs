//! `edr` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{EdrArgs, EdrMode, ProfileArg};
use crate::pipeline::{file_stem, resolve_config, Pipeline, PipelineOptions};

/// Execute the `edr` command
pub fn run_edr(args: &EdrArgs) -> Result<()> {
    let config = resolve_config(&args.pipeline).context("Failed to load configuration")?;

    match args.mode {
        EdrMode::Speed => {
            let table = ingestion::parse_edr_path(&args.input, config.timeline.shift_negative_time)
                .with_context(|| format!("Failed to read EDR table {}", args.input.display()))?;
            info!(
                samples = table.samples.len(),
                skipped_rows = table.skipped_rows,
                time_offset = table.time_offset,
                "EDR table loaded"
            );

            let samples =
                timeline::integrate_path(&table.samples, &config.edr, config.timeline.frame_rate)
                    .context("Failed to integrate EDR path")?;

            let options = PipelineOptions::from_args(&args.pipeline, ProfileArg::Generic, false);
            let pipeline = Pipeline::new(config, options);
            let delivered = pipeline
                .export(&args.input, &samples)
                .context("Failed to export integrated path")?;

            info!(keys = samples.len(), outputs = ?delivered, "EDR path integrated");
        }
        EdrMode::VariableOutput => {
            let table = ingestion::parse_variable_output_path(&args.input).with_context(|| {
                format!("Failed to read variable-output table {}", args.input.display())
            })?;

            let dir = args
                .pipeline
                .output_dir
                .clone()
                .or_else(|| args.input.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            let written =
                exporters::write_variable_output(&table, &dir, &file_stem(&args.input))
                    .context("Failed to write RaceRender files")?;

            for path in &written {
                println!("{}", path.display());
            }
            info!(vehicles = written.len(), "RaceRender files written");
        }
    }

    Ok(())
}
