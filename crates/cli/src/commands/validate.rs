//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{AxisRole, ExportFormat, PipelineConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    frame_rate: f64,
    resample_policy: String,
    angles: String,
    keyword_count: usize,
    output_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    frame_rate: config.timeline.frame_rate,
                    resample_policy: format!("{:?}", config.timeline.resample_policy),
                    angles: format!("{:?}", config.units.angles),
                    keyword_count: AxisRole::ALL
                        .iter()
                        .map(|a| config.keywords.keywords(*a).len())
                        .sum(),
                    output_count: config.outputs.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &PipelineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.outputs.is_empty() {
        warnings.push("No outputs configured - use --format or --output-dir when converting".to_string());
    }

    for output in &config.outputs {
        if output.path.is_none() {
            warnings.push(format!(
                "Output '{}' has no path - samples will only be logged",
                output.name
            ));
        }
    }

    for axis in AxisRole::ALL {
        if config.keywords.keywords(axis).is_empty() {
            warnings.push(format!("No keywords for axis {axis} - it can only rest"));
        }
    }

    if config
        .outputs
        .iter()
        .filter(|o| o.format == ExportFormat::H3d)
        .count()
        > 1
    {
        warnings.push("Several h3d outputs configured".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Frame rate: {} Hz", summary.frame_rate);
            println!("  Resample policy: {}", summary.resample_policy);
            println!("  Angles: {}", summary.angles);
            println!("  Keywords: {}", summary.keyword_count);
            println!("  Outputs: {}", summary.output_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
