//! XYZ / roll-pitch-yaw profile
//!
//! Headerless rows `time, x, y, z, roll, pitch, yaw` with angles in degrees.
//! Rows with fewer than seven fields, unparseable fields or a time that does not
//! advance are skipped.

use std::path::Path;

use contracts::{Channel, ChannelSet, ColumnRole, MotionError, Result, Timebase};
use tracing::{debug, instrument, warn};

use crate::numeric::parse_number;
use crate::reader::read_records;

const FIELDS: [&str; 7] = ["time", "x", "y", "z", "roll", "pitch", "yaw"];

/// Parse an xyzrpy table into a channel set
///
/// Positions are multiplied by `length_scale` (0.3048 for feet); angle channels
/// are tagged `deg`.
#[instrument(name = "xyzrpy_parse", skip(text), fields(source = %source_name))]
pub fn parse_xyzrpy_str(text: &str, source_name: &str, length_scale: f64) -> Result<ChannelSet> {
    let records = read_records(text, ',')?;

    let mut channels: Vec<Channel> = FIELDS.iter().map(|name| Channel::new(*name)).collect();
    for channel in &mut channels[4..] {
        channel.unit = Some("deg".to_string());
    }

    let mut rows = 0;
    for record in &records {
        if record.fields.len() < FIELDS.len() {
            continue;
        }
        let Some(values) = record.fields[..FIELDS.len()]
            .iter()
            .map(|f| parse_number(f))
            .collect::<Option<Vec<f64>>>()
        else {
            debug!(line = record.line, "skipped unparseable xyzrpy row");
            continue;
        };

        let time = values[0];
        if channels[0].time_range().is_some_and(|(_, last)| time <= last) {
            warn!(line = record.line, time, "skipped xyzrpy row with non-increasing time");
            continue;
        }
        for (idx, channel) in channels.iter_mut().enumerate() {
            let value = if (1..4).contains(&idx) {
                values[idx] * length_scale
            } else {
                values[idx]
            };
            channel.push(time, value)?;
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(MotionError::empty_input(source_name));
    }

    let mut set = ChannelSet::new(source_name);
    set.row_count = rows;
    set.timebase = Some(Timebase {
        role: ColumnRole::Time,
        column: FIELDS[0].to_string(),
    });
    for channel in channels {
        set.insert(channel);
    }
    debug!(rows, "parsed xyzrpy table");
    Ok(set)
}

/// Read and parse an xyzrpy file
pub fn parse_xyzrpy_path(path: &Path, length_scale: f64) -> Result<ChannelSet> {
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_xyzrpy_str(&text, &name, length_scale)
}
