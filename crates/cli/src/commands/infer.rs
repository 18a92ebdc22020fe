//! `infer` command implementation.

use anyhow::{Context, Result};
use contracts::{AxisRole, InferenceReport};
use ingestion::TabularParser;
use tracing::warn;

use crate::cli::InferArgs;
use crate::pipeline::{helper_names, load_config};

/// Execute the `infer` command
pub fn run_infer(args: &InferArgs) -> Result<()> {
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let helpers = match &args.from {
        Some(path) => {
            let set = TabularParser::new(config.parse.clone())
                .parse_path(path)
                .with_context(|| format!("Failed to read helpers from {}", path.display()))?;
            helper_names(&set)
        }
        None => args.helpers.clone(),
    };

    let report = rigging::infer(&helpers, &config.keywords);
    for warning in &report.warnings {
        warn!(kind = warning.kind(), "{}", warning);
    }
    observability::record_binding_warnings(&report.warnings);

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize bindings")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &InferenceReport) {
    println!("Bindings ({}):", report.bindings.len());
    for binding in &report.bindings {
        println!("  {:<32} {:?}", binding.helper, binding.role);
    }

    println!("\nAxis sources:");
    for axis in AxisRole::ALL {
        println!(
            "  {}: {}",
            axis,
            report.sources.get(axis).unwrap_or("(rest pose)")
        );
    }

    if report.has_warnings() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
}
