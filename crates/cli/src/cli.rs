//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::{ExportFormat, ResamplePolicy};
use std::path::PathBuf;

/// HVE Motion - converts vehicle motion tables into keyframe-ready formats
#[derive(Parser, Debug)]
#[command(
    name = "hve-motion",
    author,
    version,
    about = "HVE motion table conversion pipeline",
    long_about = "Parses motion, EDR and variable-output tables, builds a frame-aligned \n\
                  motion model, reconstructs helper-driven rotations and writes CSV, \n\
                  RaceRender or H3D output."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "HVE_MOTION_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "HVE_MOTION_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "HVE_MOTION_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one motion table to the configured outputs
    Convert(ConvertArgs),

    /// Infer axis bindings from helper names
    Infer(InferArgs),

    /// Integrate an EDR speed table, or split a variable-output table into RaceRender files
    Edr(EdrArgs),

    /// Convert many motion tables in parallel
    Batch(BatchArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Inspect a motion table
    Info(InfoArgs),
}

/// Options shared by every command that runs the pipeline
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "HVE_MOTION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write outputs into this directory instead of the configured paths
    #[arg(short, long, env = "HVE_MOTION_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Replace the configured outputs with one file per format
    #[arg(short, long = "format", value_enum)]
    pub formats: Vec<FormatArg>,

    /// Override the timeline frame rate (Hz)
    #[arg(long)]
    pub frame_rate: Option<f64>,

    /// Override the resample policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Null non-numeric fields instead of failing the row
    #[arg(long)]
    pub tolerant: bool,
}

/// Arguments for the `convert` command
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Input table
    pub input: PathBuf,

    /// Input layout
    #[arg(long, value_enum, default_value = "generic")]
    pub profile: ProfileArg,

    /// Drive rotations from auxiliary helper columns
    #[arg(long)]
    pub rig: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the `infer` command
#[derive(Parser, Debug)]
pub struct InferArgs {
    /// Helper names
    #[arg(required_unless_present = "from")]
    pub helpers: Vec<String>,

    /// Take helper names from the auxiliary columns of this table
    #[arg(long, conflicts_with = "helpers")]
    pub from: Option<PathBuf>,

    /// Path to configuration file supplying the keyword table
    #[arg(short, long, env = "HVE_MOTION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edr` command
#[derive(Parser, Debug)]
pub struct EdrArgs {
    /// EDR speed table or HVE variable-output table
    pub input: PathBuf,

    /// How to read the input
    #[arg(long, value_enum, default_value = "speed")]
    pub mode: EdrMode,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the `batch` command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Input files or directories (directories contribute their `.csv` files)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Input layout
    #[arg(long, value_enum, default_value = "generic")]
    pub profile: ProfileArg,

    /// Drive rotations from auxiliary helper columns
    #[arg(long)]
    pub rig: bool,

    /// Maximum files processed at once (0 = available parallelism)
    #[arg(short, long, default_value = "0", env = "HVE_MOTION_JOBS")]
    pub jobs: usize,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "hve-motion.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Motion table to inspect
    pub input: PathBuf,

    /// Path to configuration file (parse options and keyword table)
    #[arg(short, long, env = "HVE_MOTION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show inferred bindings for auxiliary columns
    #[arg(long)]
    pub bindings: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Racerender,
    H3d,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => Self::Csv,
            FormatArg::Racerender => Self::Racerender,
            FormatArg::H3d => Self::H3d,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyArg {
    Exact,
    Nearest,
    Linear,
}

impl From<PolicyArg> for ResamplePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Exact => Self::Exact,
            PolicyArg::Nearest => Self::Nearest,
            PolicyArg::Linear => Self::Linear,
        }
    }
}

/// Input table layout
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileArg {
    /// Headered motion table (time/frame, position, rotation, auxiliary columns)
    #[default]
    Generic,
    /// Headerless `time,x,y,z,roll,pitch,yaw` rows
    Xyzrpy,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdrMode {
    /// `time,speed,yaw_rate` rows integrated into a planar path
    #[default]
    Speed,
    /// HVE variable-output table, one RaceRender file per vehicle
    VariableOutput,
}
