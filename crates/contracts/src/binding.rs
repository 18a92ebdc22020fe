//! HelperBinding - Axis Inference Engine output
//!
//! Keyword table, bindings of helper names to axis roles, and the non-fatal
//! warnings raised while binding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AxisRole;

/// Case-insensitive substrings that identify the helper driving each axis
///
/// Replaceable wholesale through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationKeywordTable {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<String>,
}

impl RotationKeywordTable {
    /// Built-in preset: camber drives X, rotation/pitch drive Y, steering/yaw drive Z
    pub fn hve_default() -> Self {
        Self {
            x: vec!["camber".into(), "cam".into()],
            y: vec!["rotation".into(), "pitch".into()],
            z: vec!["steering".into(), "yaw".into()],
        }
    }

    pub fn new(x: Vec<String>, y: Vec<String>, z: Vec<String>) -> Self {
        Self { x, y, z }
    }

    pub fn keywords(&self, axis: AxisRole) -> &[String] {
        match axis {
            AxisRole::X => &self.x,
            AxisRole::Y => &self.y,
            AxisRole::Z => &self.z,
        }
    }

    /// Every keyword of every axis, lowercased
    pub fn all_keywords_lowercase(&self) -> Vec<String> {
        AxisRole::ALL
            .into_iter()
            .flat_map(|axis| self.keywords(axis).iter().map(|k| k.to_lowercase()))
            .collect()
    }
}

impl Default for RotationKeywordTable {
    fn default() -> Self {
        Self::hve_default()
    }
}

/// Role assigned to a helper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingRole {
    X,
    Y,
    Z,
    /// Matched no keyword; the helper drives nothing
    Unmapped,
}

impl BindingRole {
    pub fn axis(self) -> Option<AxisRole> {
        match self {
            Self::X => Some(AxisRole::X),
            Self::Y => Some(AxisRole::Y),
            Self::Z => Some(AxisRole::Z),
            Self::Unmapped => None,
        }
    }
}

impl From<AxisRole> for BindingRole {
    fn from(axis: AxisRole) -> Self {
        match axis {
            AxisRole::X => Self::X,
            AxisRole::Y => Self::Y,
            AxisRole::Z => Self::Z,
        }
    }
}

/// Association of one helper name with its inferred role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperBinding {
    pub helper: String,
    pub role: BindingRole,
}

/// Non-fatal findings of axis inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingWarning {
    /// One helper name matched keywords of several axes
    AmbiguousBinding {
        helper: String,
        matched: Vec<AxisRole>,
        assigned: AxisRole,
    },
    /// A later helper replaced an earlier one as the source of an axis
    DuplicateBinding {
        axis: AxisRole,
        previous: String,
        replacement: String,
    },
}

impl BindingWarning {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AmbiguousBinding { .. } => "ambiguous_binding",
            Self::DuplicateBinding { .. } => "duplicate_binding",
        }
    }
}

impl fmt::Display for BindingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousBinding {
                helper,
                matched,
                assigned,
            } => {
                let axes: Vec<String> = matched.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "helper '{helper}' matches axes [{}], bound to {assigned}",
                    axes.join(", ")
                )
            }
            Self::DuplicateBinding {
                axis,
                previous,
                replacement,
            } => write!(
                f,
                "axis {axis} source '{previous}' replaced by later helper '{replacement}'"
            ),
        }
    }
}

/// Helper selected as the source of each axis (`None`: rest pose)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSources {
    pub x: Option<String>,
    pub y: Option<String>,
    pub z: Option<String>,
}

impl AxisSources {
    pub fn get(&self, axis: AxisRole) -> Option<&str> {
        match axis {
            AxisRole::X => self.x.as_deref(),
            AxisRole::Y => self.y.as_deref(),
            AxisRole::Z => self.z.as_deref(),
        }
    }

    /// Set the source, returning the one it replaced
    pub fn replace(&mut self, axis: AxisRole, helper: String) -> Option<String> {
        let slot = match axis {
            AxisRole::X => &mut self.x,
            AxisRole::Y => &mut self.y,
            AxisRole::Z => &mut self.z,
        };
        slot.replace(helper)
    }

    /// Axes with no source helper
    pub fn missing(&self) -> Vec<AxisRole> {
        AxisRole::ALL
            .into_iter()
            .filter(|axis| self.get(*axis).is_none())
            .collect()
    }
}

/// Full result of one inference pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReport {
    /// One binding per distinct helper, in input order
    pub bindings: Vec<HelperBinding>,

    /// Axis -> source helper after tie-breaking
    pub sources: AxisSources,

    pub warnings: Vec<BindingWarning>,
}

impl InferenceReport {
    /// Role bound to a helper name
    pub fn role_of(&self, helper: &str) -> Option<BindingRole> {
        self.bindings
            .iter()
            .find(|b| b.helper == helper)
            .map(|b| b.role)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
