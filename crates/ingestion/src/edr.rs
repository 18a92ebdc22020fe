//! EDR speed table profile
//!
//! Loose `time, speed, yaw_rate` tables exported from event data recorders. Rows
//! that do not start with three numbers (titles, headers, notes) are skipped.

use std::path::Path;

use contracts::{EdrSample, EdrTable, MotionError, Result};
use tracing::{debug, instrument};

use crate::numeric::parse_number;
use crate::reader::read_records;

/// Parse an EDR table from text
///
/// With `shift_negative_time`, a negative minimum time shifts every time so the
/// minimum lands on 0.
#[instrument(name = "edr_parse", skip(text), fields(source = %source_name))]
pub fn parse_edr_str(text: &str, source_name: &str, shift_negative_time: bool) -> Result<EdrTable> {
    let records = read_records(text, ',')?;

    let mut samples = Vec::new();
    let mut skipped_rows = 0;
    for record in &records {
        let parsed = (record.fields.len() >= 3)
            .then(|| {
                Some(EdrSample {
                    time: parse_number(&record.fields[0])?,
                    speed: parse_number(&record.fields[1])?,
                    yaw_rate: parse_number(&record.fields[2])?,
                })
            })
            .flatten();
        match parsed {
            Some(sample) => samples.push(sample),
            None => {
                skipped_rows += 1;
                debug!(line = record.line, "skipped non-numeric EDR row");
            }
        }
    }

    if samples.is_empty() {
        return Err(MotionError::empty_input(source_name));
    }

    let min_time = samples
        .iter()
        .map(|s| s.time)
        .fold(f64::INFINITY, f64::min);
    let time_offset = if shift_negative_time && min_time < 0.0 {
        min_time
    } else {
        0.0
    };
    if time_offset != 0.0 {
        for sample in &mut samples {
            sample.time -= time_offset;
        }
    }

    debug!(
        samples = samples.len(),
        skipped_rows,
        time_offset,
        "parsed EDR table"
    );
    Ok(EdrTable {
        source_name: source_name.to_string(),
        samples,
        time_offset,
        skipped_rows,
    })
}

/// Read and parse an EDR table file
pub fn parse_edr_path(path: &Path, shift_negative_time: bool) -> Result<EdrTable> {
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_edr_str(&text, &name, shift_negative_time)
}
