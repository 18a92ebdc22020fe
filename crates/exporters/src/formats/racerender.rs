//! RaceRender data files
//!
//! Two sources:
//! - motion samples: `Time (sec), Frame, X (m), Y (m), Z (m), Roll/Pitch/Yaw (deg), extras`
//! - variable-output tables: one file per vehicle, `Time (sec)` then `translated unit`
//!
//! Variable-output times are rounded to milliseconds; sample times are written
//! at full precision. Lines end with CRLF.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use contracts::{AxisRole, MotionSample, RecordLayout, VariableOutputTable};
use tracing::info;

use super::{finish_csv, fmt_optional, fmt_value};
use crate::error::ExportError;

/// Translated names containing any of these are left out of variable-output files
pub const RACERENDER_EXCLUDED: [&str; 3] = ["WheelsOut", "TiresOut", "Axle"];

const TIME_HEADER: &str = "Time (sec)";

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new())
}

fn round_millis(t: f64) -> f64 {
    (t * 1000.0).round() / 1000.0
}

fn rotation_header(axis: AxisRole) -> &'static str {
    match axis {
        AxisRole::X => "Roll (deg)",
        AxisRole::Y => "Pitch (deg)",
        AxisRole::Z => "Yaw (deg)",
    }
}

pub(super) fn encode_samples(samples: &[MotionSample]) -> Result<Bytes, ExportError> {
    let layout = RecordLayout::from_samples(samples);
    let mut writer = writer();

    let mut header: Vec<&str> = vec![TIME_HEADER, "Frame", "X (m)", "Y (m)", "Z (m)"];
    header.extend(layout.rotation_axes.iter().map(|a| rotation_header(*a)));
    header.extend(layout.extra_columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in layout.records(samples) {
        let mut row = vec![fmt_value(record.time), record.frame.to_string()];
        row.extend(record.position.iter().map(|v| fmt_value(*v)));
        row.extend(
            layout
                .rotation_axes
                .iter()
                .map(|a| fmt_optional(record.orientation.get(*a).map(f64::to_degrees))),
        );
        row.extend(record.extras.iter().map(|(_, v)| fmt_optional(*v)));
        writer.write_record(&row)?;
    }

    finish_csv(writer, "racerender")
}

/// RaceRender file for one vehicle of a variable-output table
///
/// Row `i` is timed `round(i * time_step, 3)`.
///
/// # Errors
/// `Encode` when the table has no column for `vehicle`
pub fn encode_variable_output(
    table: &VariableOutputTable,
    vehicle: &str,
) -> Result<Bytes, ExportError> {
    if table.columns_for(vehicle).next().is_none() {
        return Err(ExportError::encode(
            "racerender",
            format!("no columns for vehicle '{vehicle}'"),
        ));
    }
    let columns: Vec<_> = table
        .columns_for(vehicle)
        .filter(|c| !RACERENDER_EXCLUDED.iter().any(|k| c.translated.contains(k)))
        .collect();

    let mut writer = writer();
    let mut header = vec![TIME_HEADER.to_string()];
    header.extend(columns.iter().map(|c| c.display_header()));
    writer.write_record(&header)?;

    for i in 0..table.row_count() {
        let mut row = vec![fmt_value(round_millis(i as f64 * table.time_step))];
        row.extend(
            columns
                .iter()
                .map(|c| fmt_value(c.values.get(i).copied().unwrap_or(0.0))),
        );
        writer.write_record(&row)?;
    }

    finish_csv(writer, "racerender")
}

/// `{stem}_{vehicle}_RaceRender.csv`
pub fn racerender_file_name(stem: &str, vehicle: &str) -> String {
    format!("{stem}_{vehicle}_RaceRender.csv")
}

/// Write one RaceRender file per vehicle into `dir`
pub fn write_variable_output(
    table: &VariableOutputTable,
    dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for vehicle in table.vehicles() {
        let bytes = encode_variable_output(table, &vehicle)?;
        let path = dir.join(racerender_file_name(stem, &vehicle));
        std::fs::write(&path, &bytes)?;
        ::metrics::counter!("hve_motion_bytes_exported_total", "format" => "racerender")
            .increment(bytes.len() as u64);
        info!(vehicle = %vehicle, path = %path.display(), "wrote RaceRender file");
        written.push(path);
    }
    Ok(written)
}
