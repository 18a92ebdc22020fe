//! VariableOutputTable - HVE variable-output profile
//!
//! Multi-vehicle simulation output: one time column followed by columns that each
//! belong to a vehicle and an `Object:Variable` pair.

use serde::{Deserialize, Serialize};

/// Object name that marks a table as carrying vehicle motion
pub const KINEMATIC_OBJECT: &str = "KinematicOut";

/// One variable column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableColumn {
    pub vehicle: String,
    /// Text before the last `:` of the variable name
    pub object: String,
    /// Text after the last `:` of the variable name
    pub variable: String,
    /// Human-readable `Object: Variable` label
    pub translated: String,
    pub unit: String,
    pub values: Vec<f64>,
}

impl VariableColumn {
    /// `translated unit`, trimmed
    pub fn display_header(&self) -> String {
        format!("{} {}", self.translated, self.unit).trim().to_string()
    }
}

/// Parsed variable-output table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableOutputTable {
    pub source_name: String,
    /// Time column, seconds
    pub times: Vec<f64>,
    /// Difference of the first two times
    pub time_step: f64,
    /// Columns in file order
    pub columns: Vec<VariableColumn>,
}

impl VariableOutputTable {
    /// Vehicle names in order of first appearance
    pub fn vehicles(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for column in &self.columns {
            if !names.contains(&column.vehicle) {
                names.push(column.vehicle.clone());
            }
        }
        names
    }

    pub fn columns_for<'a>(&'a self, vehicle: &'a str) -> impl Iterator<Item = &'a VariableColumn> {
        self.columns.iter().filter(move |c| c.vehicle == vehicle)
    }

    /// Whether any vehicle carries the kinematic output object
    pub fn has_kinematics(&self) -> bool {
        self.columns.iter().any(|c| c.object == KINEMATIC_OBJECT)
    }

    pub fn row_count(&self) -> usize {
        self.times.len()
    }
}
