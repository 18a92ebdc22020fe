//! Header row interpretation
//!
//! Each header cell becomes a `ColumnSpec`: base name, unit label, role and the
//! scale factor that normalises its values.

use std::collections::HashSet;

use contracts::{split_unit_suffix, unit_conversion, ColumnRole, MotionError, Result, UnitKind};

/// One column of the table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Base name, unit decoration stripped
    pub name: String,
    /// Unit after normalisation, or as written when not converted
    pub unit: Option<String>,
    pub role: ColumnRole,
    /// Multiplier applied to every value of this column
    pub scale: f64,
}

impl ColumnSpec {
    /// Interpret one header cell
    pub fn from_header(cell: &str, normalize_units: bool) -> Self {
        let (name, unit) = split_unit_suffix(cell);
        let role = ColumnRole::classify(&name);

        let conversion = unit
            .as_deref()
            .and_then(unit_conversion)
            .filter(|c| matches!(c.kind, UnitKind::Length | UnitKind::Speed | UnitKind::Duration));

        let (unit, scale) = match conversion {
            Some(c) if normalize_units => (Some(c.canonical.to_string()), c.factor),
            _ => (unit, 1.0),
        };

        Self {
            name,
            unit,
            role,
            scale,
        }
    }

    /// Column generated for headerless input
    pub fn positional(index: usize) -> Self {
        Self::from_header(&positional_name(index), false)
    }
}

/// `column_1`, `column_2`, ...
pub fn positional_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

/// Build the column list from header cells
///
/// Trailing empty cells are dropped; an empty cell in the middle gets a
/// positional name. Duplicate base names fail with `MalformedRow` at `line`.
pub fn columns_from_header(
    cells: &[String],
    line: u64,
    normalize_units: bool,
) -> Result<Vec<ColumnSpec>> {
    let used = cells
        .iter()
        .rposition(|c| !c.trim().is_empty())
        .map_or(0, |idx| idx + 1);

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(used);
    for (idx, cell) in cells[..used].iter().enumerate() {
        let column = if cell.trim().is_empty() {
            ColumnSpec::positional(idx)
        } else {
            ColumnSpec::from_header(cell, normalize_units)
        };
        if !seen.insert(column.name.clone()) {
            return Err(MotionError::malformed_row(
                line,
                Some(&column.name),
                "duplicate column name in header",
            ));
        }
        columns.push(column);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unit_suffix_normalised() {
        let col = ColumnSpec::from_header("X (ft)", true);
        assert_eq!(col.name, "X");
        assert_eq!(col.unit.as_deref(), Some("m"));
        assert_eq!(col.role, ColumnRole::PositionX);
        assert!((col.scale - 0.3048).abs() < 1e-12);

        let raw = ColumnSpec::from_header("X (ft)", false);
        assert_eq!(raw.unit.as_deref(), Some("ft"));
        assert_eq!(raw.scale, 1.0);
    }

    #[test]
    fn test_angle_unit_kept_unscaled() {
        let col = ColumnSpec::from_header("Yaw [deg]", true);
        assert_eq!(col.unit.as_deref(), Some("deg"));
        assert_eq!(col.scale, 1.0);
        assert_eq!(col.role, ColumnRole::RotationZ);
    }

    #[test]
    fn test_trailing_empty_header_cells_dropped() {
        let columns = columns_from_header(&cells(&["time", "x", "", ""]), 1, true).unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_middle_empty_cell_positional() {
        let columns = columns_from_header(&cells(&["time", "", "x"]), 1, true).unwrap();
        assert_eq!(columns[1].name, "column_2");
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = columns_from_header(&cells(&["time", "X (m)", "X (ft)"]), 4, true).unwrap_err();
        assert!(matches!(err, MotionError::MalformedRow { row: 4, .. }));
    }
}
