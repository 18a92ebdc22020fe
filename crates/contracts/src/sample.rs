//! MotionSample - Motion Sample Model output
//!
//! One frame of position, per-axis rotation and named auxiliary channels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Euler rotation axis a helper drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisRole {
    X,
    Y,
    Z,
}

impl AxisRole {
    /// Priority order used for tie-breaking
    pub const ALL: [AxisRole; 3] = [AxisRole::X, AxisRole::Y, AxisRole::Z];

    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        };
        f.write_str(label)
    }
}

/// Per-axis rotation (radians); `None` means the axis is not driven (rest pose)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisAngles {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl AxisAngles {
    pub fn get(&self, axis: AxisRole) -> Option<f64> {
        match axis {
            AxisRole::X => self.x,
            AxisRole::Y => self.y,
            AxisRole::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: AxisRole, value: Option<f64>) {
        match axis {
            AxisRole::X => self.x = value,
            AxisRole::Y => self.y = value,
            AxisRole::Z => self.z = value,
        }
    }

    /// Angles with undriven axes at rest (0)
    pub fn or_rest(&self) -> [f64; 3] {
        [
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        ]
    }

    /// Axes that carry a value
    pub fn present_axes(&self) -> Vec<AxisRole> {
        AxisRole::ALL
            .into_iter()
            .filter(|axis| self.get(*axis).is_some())
            .collect()
    }
}

/// One frame of motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Frame index (unique and increasing within a sequence)
    pub frame: i64,

    /// Time in seconds
    pub time: f64,

    /// Position (x, y, z) in metres; components with no source column are 0
    pub position: [f64; 3],

    /// Per-axis rotation in radians
    pub rotation: AxisAngles,

    /// Auxiliary named channels
    #[serde(default)]
    pub channels: BTreeMap<String, f64>,
}

impl MotionSample {
    pub fn new(frame: i64, time: f64) -> Self {
        Self {
            frame,
            time,
            position: [0.0; 3],
            rotation: AxisAngles::default(),
            channels: BTreeMap::new(),
        }
    }
}

/// Check the model invariant: frames strictly increasing
///
/// Returns the index of the first offending sample.
pub fn first_order_violation(samples: &[MotionSample]) -> Option<usize> {
    samples
        .windows(2)
        .position(|pair| pair[1].frame <= pair[0].frame)
        .map(|idx| idx + 1)
}
