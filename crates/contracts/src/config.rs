//! PipelineConfig - Config Loader output
//!
//! The explicit configuration surface: keyword table, parse options, timeline
//! resampling policy, unit flags, EDR integration parameters and output routing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::RotationKeywordTable;

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Axis-keyword table used by inference
    #[serde(default)]
    pub keywords: RotationKeywordTable,

    /// Tabular parser options
    #[serde(default)]
    pub parse: ParseConfig,

    /// Timeline construction options
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Unit normalisation flags
    #[serde(default)]
    pub units: UnitConfig,

    /// EDR path integration options
    #[serde(default)]
    pub edr: EdrConfig,

    /// Output routing
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// How non-numeric fields are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericMode {
    /// A non-numeric field fails the row
    #[default]
    Strict,
    /// A non-numeric field becomes a missing value (explicit opt-in)
    Tolerant,
}

/// Where column names come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// First non-blank line is the header
    #[default]
    Auto,
    /// No header; columns are named `column_1`, `column_2`, ...
    None,
    /// Caller-supplied names; every non-blank line is data
    Explicit(Vec<String>),
}

/// Tabular parser options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default)]
    pub numeric_mode: NumericMode,

    #[serde(default)]
    pub header: HeaderMode,

    /// Convert recognised length/speed/duration units to SI
    #[serde(default = "default_true")]
    pub normalize_units: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            numeric_mode: NumericMode::default(),
            header: HeaderMode::default(),
            normalize_units: true,
        }
    }
}

/// How a channel is sampled at a timeline key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplePolicy {
    /// Only a sample at exactly the key counts
    Exact,
    /// Hold the value at or before the key
    #[default]
    Nearest,
    /// Linear interpolation, clamped outside the channel range
    Linear,
}

/// Timeline construction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    #[serde(default)]
    pub resample_policy: ResamplePolicy,

    /// Shift times so a negative start lands on 0
    #[serde(default)]
    pub shift_negative_time: bool,
}

fn default_frame_rate() -> f64 {
    30.0
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            resample_policy: ResamplePolicy::default(),
            shift_negative_time: false,
        }
    }
}

/// Unit of rotation values that carry no explicit header unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Recognise an explicit header unit label
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" | "°" => Some(Self::Degrees),
            "rad" | "radian" | "radians" => Some(Self::Radians),
            _ => None,
        }
    }

    /// Convert a value in this unit to radians
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            Self::Degrees => value.to_radians(),
            Self::Radians => value,
        }
    }
}

/// Unit normalisation flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    #[serde(default)]
    pub angles: AngleUnit,

    /// Multiplier applied to positions (0.3048 for feet)
    #[serde(default = "default_position_scale")]
    pub position_scale: f64,
}

fn default_position_scale() -> f64 {
    1.0
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            angles: AngleUnit::default(),
            position_scale: default_position_scale(),
        }
    }
}

/// Unit of the EDR speed column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    #[default]
    Mps,
    Mph,
    Kph,
}

impl SpeedUnit {
    /// Factor converting this unit to m/s
    pub fn to_mps_factor(self) -> f64 {
        match self {
            Self::Mps => 1.0,
            Self::Mph => 0.44704,
            Self::Kph => 1.0 / 3.6,
        }
    }
}

/// Planar pose the EDR integration starts from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialPose {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Heading in degrees
    #[serde(default)]
    pub heading_deg: f64,
}

/// EDR path integration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdrConfig {
    #[serde(default)]
    pub speed_unit: SpeedUnit,

    /// Yaw rate column is in degrees per second
    #[serde(default = "default_true")]
    pub yaw_rate_in_degrees: bool,

    #[serde(default)]
    pub initial_pose: InitialPose,
}

impl Default for EdrConfig {
    fn default() -> Self {
        Self {
            speed_unit: SpeedUnit::default(),
            yaw_rate_in_degrees: true,
            initial_pose: InitialPose::default(),
        }
    }
}

/// Output serialisation format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Generic motion CSV
    Csv,
    /// RaceRender data-file profile
    Racerender,
    /// H3D (Inventor ascii) motion block
    H3d,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv | Self::Racerender => "csv",
            Self::H3d => "h3d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Racerender => "racerender",
            Self::H3d => "h3d",
        }
    }
}

/// One output route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Unique name, used in logs and metrics
    pub name: String,

    pub format: ExportFormat,

    /// Target path (a directory in batch mode); `None` logs instead of writing
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Transform name written into H3D blocks
    #[serde(default)]
    pub object_name: Option<String>,
}
