//! Delimited record reader
//!
//! Thin layer over the `csv` crate: quoting, whitespace trimming, blank-line
//! skipping and 1-based line numbers for error context.

use contracts::{MotionError, Result};

/// One non-blank record
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line number where the record starts
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Fields with trailing empty cells removed
    pub fn trimmed_len(&self) -> usize {
        self.fields
            .iter()
            .rposition(|f| !f.is_empty())
            .map_or(0, |idx| idx + 1)
    }
}

/// Read every non-blank record of `text`
///
/// A record whose fields are all empty (a blank line, or a line of bare
/// delimiters) is skipped.
pub fn read_records(text: &str, delimiter: char) -> Result<Vec<RawRecord>> {
    let delimiter = u8::try_from(delimiter).map_err(|_| {
        MotionError::invalid_argument("delimiter", format!("{delimiter:?} is not ASCII"))
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(from_csv_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |pos| pos.line());
        records.push(RawRecord {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }
    Ok(records)
}

fn from_csv_error(err: csv::Error) -> MotionError {
    let line = err.position().map_or(0, |pos| pos.line());
    MotionError::malformed_row(line, None, format!("unreadable record: {err}"))
}
