//! HVE variable-output profile
//!
//! Layout:
//! - row 0: vehicle name per column
//! - row 1: `Object:Variable`
//! - row 2: translated `Object: Variable`
//! - row 3: units
//! - rows 4..: data, time in column 0

use std::path::Path;

use contracts::{MotionError, Result, VariableColumn, VariableOutputTable};
use tracing::{debug, instrument};

use crate::numeric::parse_number;
use crate::reader::{read_records, RawRecord};

const HEADER_ROWS: usize = 4;

/// Parse a variable-output table from text
///
/// # Errors
/// - `EmptyInput` when there are no data rows
/// - `MalformedRow` on a non-numeric or missing data cell
/// - `InvalidArgument` with fewer than two data rows or no `KinematicOut` object
#[instrument(name = "variable_output_parse", skip(text), fields(source = %source_name))]
pub fn parse_variable_output_str(text: &str, source_name: &str) -> Result<VariableOutputTable> {
    let records = read_records(text, ',')?;
    if records.len() <= HEADER_ROWS {
        return Err(MotionError::empty_input(source_name));
    }
    let (header, data) = records.split_at(HEADER_ROWS);

    let width = header[0].fields.len();
    let mut columns: Vec<VariableColumn> = (1..width)
        .map(|j| header_column(header, j))
        .collect();

    let mut times = Vec::with_capacity(data.len());
    for record in data {
        times.push(data_cell(record, 0, "time")?);
        for (j, column) in columns.iter_mut().enumerate() {
            let value = data_cell(record, j + 1, &column.translated)?;
            column.values.push(value);
        }
    }

    if times.len() < 2 {
        return Err(MotionError::invalid_argument(
            source_name,
            "at least two data rows are required to derive the time step",
        ));
    }
    let time_step = times[1] - times[0];

    let table = VariableOutputTable {
        source_name: source_name.to_string(),
        times,
        time_step,
        columns,
    };
    if !table.has_kinematics() {
        return Err(MotionError::invalid_argument(
            source_name,
            format!("not an HVE motion file: no {} object", contracts::KINEMATIC_OBJECT),
        ));
    }

    debug!(
        rows = table.row_count(),
        columns = table.columns.len(),
        vehicles = table.vehicles().len(),
        time_step,
        "parsed variable output"
    );
    Ok(table)
}

/// Read and parse a variable-output file
pub fn parse_variable_output_path(path: &Path) -> Result<VariableOutputTable> {
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_variable_output_str(&text, &name)
}

fn cell(record: &RawRecord, idx: usize) -> &str {
    record.fields.get(idx).map_or("", String::as_str)
}

fn header_column(header: &[RawRecord], j: usize) -> VariableColumn {
    let object_variable = cell(&header[1], j);
    let (object, variable) = match object_variable.rfind(':') {
        Some(pos) => (&object_variable[..pos], &object_variable[pos + 1..]),
        None => (object_variable, ""),
    };
    VariableColumn {
        vehicle: cell(&header[0], j).to_string(),
        object: object.trim().to_string(),
        variable: variable.trim().to_string(),
        translated: cell(&header[2], j).to_string(),
        unit: cell(&header[3], j).to_string(),
        values: Vec::new(),
    }
}

fn data_cell(record: &RawRecord, idx: usize, column: &str) -> Result<f64> {
    parse_number(cell(record, idx)).ok_or_else(|| {
        MotionError::malformed_row(
            record.line,
            Some(column),
            format!("not a number: '{}'", cell(record, idx)),
        )
    })
}
