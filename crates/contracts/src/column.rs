//! Column naming conventions
//!
//! Header cells look like `Name`, `Name (unit)` or `Name [unit]`. The decoration is
//! split off, the unit is normalised, and the base name is classified into a role.

use serde::{Deserialize, Serialize};

use crate::AxisRole;

/// Role a tabular column plays in the motion model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Time,
    FrameIndex,
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    /// EDR event/trigger flag
    Event,
    Auxiliary,
}

const TIME_NAMES: &[&str] = &["time", "t", "timestamp", "elapsed", "elapsed time", "time sec"];
const FRAME_NAMES: &[&str] = &["frame", "frame index", "frame idx", "frame number"];
const EVENT_NAMES: &[&str] = &["event", "trigger", "event flag", "trigger flag"];

impl ColumnRole {
    /// Classify a base column name (unit decoration already stripped)
    pub fn classify(name: &str) -> Self {
        let key = canonical_key(name);
        let key = key.as_str();

        if TIME_NAMES.contains(&key) {
            return Self::Time;
        }
        if FRAME_NAMES.contains(&key) {
            return Self::FrameIndex;
        }
        if EVENT_NAMES.contains(&key) {
            return Self::Event;
        }

        match key {
            "x" | "pos x" | "position x" | "location x" | "loc x" => Self::PositionX,
            "y" | "pos y" | "position y" | "location y" | "loc y" => Self::PositionY,
            "z" | "pos z" | "position z" | "location z" | "loc z" => Self::PositionZ,
            "rot x" | "rotation x" | "roll" => Self::RotationX,
            "rot y" | "rotation y" | "pitch" => Self::RotationY,
            "rot z" | "rotation z" | "yaw" | "heading" => Self::RotationZ,
            _ => Self::Auxiliary,
        }
    }

    /// Rotation axis carried by this column, if any
    pub fn rotation_axis(self) -> Option<AxisRole> {
        match self {
            Self::RotationX => Some(AxisRole::X),
            Self::RotationY => Some(AxisRole::Y),
            Self::RotationZ => Some(AxisRole::Z),
            _ => None,
        }
    }

    /// Position component index (0..3), if any
    pub fn position_index(self) -> Option<usize> {
        match self {
            Self::PositionX => Some(0),
            Self::PositionY => Some(1),
            Self::PositionZ => Some(2),
            _ => None,
        }
    }

    /// Whether this column can serve as the timeline key
    pub fn is_timebase(self) -> bool {
        matches!(self, Self::Time | Self::FrameIndex)
    }
}

/// Lowercase, with `_`, `-` and repeated whitespace folded to single spaces
fn canonical_key(name: &str) -> String {
    name.to_lowercase()
        .replace(['_', '-', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split `"X (m)"` / `"X [m]"` into `("X", Some("m"))`
pub fn split_unit_suffix(header: &str) -> (String, Option<String>) {
    let trimmed = header.trim();
    for (open, close) in [('(', ')'), ('[', ']')] {
        if let Some(stripped) = trimmed.strip_suffix(close) {
            if let Some(idx) = stripped.rfind(open) {
                let base = stripped[..idx].trim();
                let unit = stripped[idx + open.len_utf8()..].trim();
                if !base.is_empty() {
                    let unit = (!unit.is_empty()).then(|| unit.to_string());
                    return (base.to_string(), unit);
                }
            }
        }
    }
    (trimmed.to_string(), None)
}

/// Physical quantity family of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Length,
    Speed,
    Duration,
    Angle,
    AngularRate,
    Other,
}

/// A recognised unit and its conversion into the canonical unit of its family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    pub kind: UnitKind,
    /// Canonical unit label after conversion
    pub canonical: &'static str,
    /// Multiply source values by this to reach the canonical unit
    pub factor: f64,
}

/// Look up a unit label
///
/// Angles are recognised but keep a factor of 1: degree/radian handling is an explicit
/// flag of the rotation stage, not a parse-time conversion.
pub fn unit_conversion(unit: &str) -> Option<UnitConversion> {
    let key = unit.trim().to_lowercase();
    let (kind, canonical, factor) = match key.as_str() {
        "m" | "meter" | "meters" | "metre" | "metres" => (UnitKind::Length, "m", 1.0),
        "ft" | "feet" | "foot" => (UnitKind::Length, "m", 0.3048),
        "in" | "inch" | "inches" => (UnitKind::Length, "m", 0.0254),
        "mm" => (UnitKind::Length, "m", 0.001),
        "cm" => (UnitKind::Length, "m", 0.01),
        "km" => (UnitKind::Length, "m", 1000.0),
        "m/s" | "mps" => (UnitKind::Speed, "m/s", 1.0),
        "mph" => (UnitKind::Speed, "m/s", 0.44704),
        "km/h" | "kph" | "kmh" => (UnitKind::Speed, "m/s", 1.0 / 3.6),
        "ft/s" | "fps" => (UnitKind::Speed, "m/s", 0.3048),
        "s" | "sec" | "secs" | "second" | "seconds" => (UnitKind::Duration, "s", 1.0),
        "ms" => (UnitKind::Duration, "s", 0.001),
        "deg" | "degree" | "degrees" | "°" => (UnitKind::Angle, "deg", 1.0),
        "rad" | "radian" | "radians" => (UnitKind::Angle, "rad", 1.0),
        "deg/s" | "deg/sec" => (UnitKind::AngularRate, "deg/s", 1.0),
        "rad/s" | "rad/sec" => (UnitKind::AngularRate, "rad/s", 1.0),
        _ => return None,
    };
    Some(UnitConversion {
        kind,
        canonical,
        factor,
    })
}
