//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{ChannelSet, InferenceReport};
use ingestion::TabularParser;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::pipeline::{helper_names, load_config};

/// Table info for JSON output
#[derive(Serialize)]
struct TableInfo {
    source: String,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    timebase: Option<String>,
    channels: Vec<ChannelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bindings: Option<InferenceReport>,
}

#[derive(Serialize)]
struct ChannelInfo {
    name: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_range: Option<(f64, f64)>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(input = %args.input.display(), "Inspecting motion table");

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let set = TabularParser::new(config.parse.clone())
        .parse_path(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let bindings = args
        .bindings
        .then(|| rigging::infer(helper_names(&set), &config.keywords));
    let table = build_table_info(&set, bindings);

    if args.json {
        let json = serde_json::to_string_pretty(&table).context("Failed to serialize table info")?;
        println!("{}", json);
    } else {
        print_table_info(&table);
    }

    Ok(())
}

fn build_table_info(set: &ChannelSet, bindings: Option<InferenceReport>) -> TableInfo {
    TableInfo {
        source: set.source_name.clone(),
        rows: set.row_count,
        timebase: set
            .timebase
            .as_ref()
            .map(|tb| format!("{} ({:?})", tb.column, tb.role)),
        channels: set
            .iter()
            .map(|c| ChannelInfo {
                name: c.name.clone(),
                role: format!("{:?}", c.role),
                unit: c.unit.clone(),
                samples: c.len(),
                time_range: c.time_range(),
            })
            .collect(),
        bindings,
    }
}

fn print_table_info(table: &TableInfo) {
    println!("📄 {}", table.source);
    println!("   ├─ Rows: {}", table.rows);
    println!(
        "   └─ Timebase: {}",
        table.timebase.as_deref().unwrap_or("(row ordinal)")
    );

    println!("\n📈 Channels ({})", table.channels.len());
    for (i, channel) in table.channels.iter().enumerate() {
        let prefix = if i == table.channels.len() - 1 { "└─" } else { "├─" };
        let unit = channel
            .unit
            .as_deref()
            .map(|u| format!(" [{u}]"))
            .unwrap_or_default();
        let range = channel
            .time_range
            .map(|(a, b)| format!(", t={a}..{b}"))
            .unwrap_or_default();
        println!(
            "   {} {}{} ({}, {} samples{})",
            prefix, channel.name, unit, channel.role, channel.samples, range
        );
    }

    if let Some(report) = &table.bindings {
        println!("\n🔗 Bindings ({})", report.bindings.len());
        for binding in &report.bindings {
            println!("   ├─ {} -> {:?}", binding.helper, binding.role);
        }
        for warning in &report.warnings {
            println!("   ⚠ {}", warning);
        }
    }

    println!();
}
