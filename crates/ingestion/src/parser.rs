//! Tabular parser
//!
//! Delimited text -> `ChannelSet`. One channel per column, every channel keyed by
//! the timebase column (time, else frame index, else row ordinal).

use std::path::Path;

use contracts::{
    Channel, ChannelSet, ColumnRole, HeaderMode, MotionError, NumericMode, ParseConfig, Result,
    Timebase,
};
use tracing::{debug, instrument};

use crate::header::{columns_from_header, ColumnSpec};
use crate::numeric::{parse_field, Field};
use crate::reader::{read_records, RawRecord};

/// Tabular parser
///
/// Pure transform: holds only its options.
#[derive(Debug, Clone, Default)]
pub struct TabularParser {
    config: ParseConfig,
}

impl TabularParser {
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Read and parse a file; the file name is used as the source name
    pub fn parse_path(&self, path: &Path) -> Result<ChannelSet> {
        let text = std::fs::read_to_string(path)?;
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.parse_str(&text, &source_name)
    }

    /// Parse delimited text
    ///
    /// # Errors
    /// - `MalformedRow` when a row's field count disagrees with the header (extra
    ///   trailing empty fields are truncated), when a field is not numeric in strict
    ///   mode, or when the timebase is missing or not strictly increasing
    /// - `EmptyInput` when there are no data rows
    #[instrument(name = "tabular_parse", skip(self, text), fields(source = %source_name))]
    pub fn parse_str(&self, text: &str, source_name: &str) -> Result<ChannelSet> {
        let records = read_records(text, self.config.delimiter)?;
        let (columns, data) = self.split_header(&records)?;

        if data.is_empty() {
            return Err(MotionError::empty_input(source_name));
        }

        let rows = data
            .iter()
            .map(|record| self.parse_row(record, &columns))
            .collect::<Result<Vec<_>>>()?;

        let timebase_idx = select_timebase(&columns);
        let keys = row_keys(&rows, data, &columns, timebase_idx)?;

        let mut set = ChannelSet::new(source_name);
        set.row_count = rows.len();
        set.timebase = timebase_idx.map(|idx| Timebase {
            role: columns[idx].role,
            column: columns[idx].name.clone(),
        });

        for (col_idx, spec) in columns.iter().enumerate() {
            let mut channel = Channel::new(spec.name.clone());
            if let Some(unit) = &spec.unit {
                channel = channel.with_unit(unit.clone());
            }
            for (row, key) in rows.iter().zip(&keys) {
                if let Some(value) = row[col_idx] {
                    channel.push(*key, value)?;
                }
            }
            set.insert(channel);
        }

        metrics::counter!("hve_motion_rows_parsed_total").increment(set.row_count as u64);
        debug!(
            rows = set.row_count,
            channels = set.len(),
            timebase = set.timebase.as_ref().map(|t| t.column.as_str()),
            "parsed table"
        );
        Ok(set)
    }

    /// Resolve columns and the data records following the header
    fn split_header<'a>(
        &self,
        records: &'a [RawRecord],
    ) -> Result<(Vec<ColumnSpec>, &'a [RawRecord])> {
        let normalize = self.config.normalize_units;
        match &self.config.header {
            HeaderMode::Explicit(names) => Ok((columns_from_header(names, 0, normalize)?, records)),
            HeaderMode::None => Ok((positional_columns(records), records)),
            HeaderMode::Auto => match records.first() {
                None => Ok((Vec::new(), records)),
                Some(first) if looks_like_header(first) => Ok((
                    columns_from_header(&first.fields, first.line, normalize)?,
                    &records[1..],
                )),
                Some(_) => Ok((positional_columns(records), records)),
            },
        }
    }

    /// Apply the field-count policy and parse every cell
    fn parse_row(&self, record: &RawRecord, columns: &[ColumnSpec]) -> Result<Vec<Option<f64>>> {
        let expected = columns.len();
        let fields = &record.fields;
        if fields.len() < expected || record.trimmed_len() > expected {
            return Err(MotionError::malformed_row(
                record.line,
                None,
                format!("expected {expected} fields, got {}", record.trimmed_len()),
            ));
        }

        columns
            .iter()
            .zip(fields)
            .map(|(spec, raw)| match parse_field(raw) {
                Field::Empty => Ok(None),
                Field::Number(value) => Ok(Some(value * spec.scale)),
                Field::Invalid => match self.config.numeric_mode {
                    NumericMode::Strict => Err(MotionError::malformed_row(
                        record.line,
                        Some(&spec.name),
                        format!("not a number: '{raw}'"),
                    )),
                    NumericMode::Tolerant => {
                        metrics::counter!("hve_motion_fields_nulled_total").increment(1);
                        debug!(line = record.line, column = %spec.name, field = %raw, "non-numeric field nulled");
                        Ok(None)
                    }
                },
            })
            .collect()
    }
}

/// A first record with any non-numeric cell is a header
fn looks_like_header(record: &RawRecord) -> bool {
    record
        .fields
        .iter()
        .any(|f| matches!(parse_field(f), Field::Invalid))
}

/// Columns for headerless input, sized by the widest record
fn positional_columns(records: &[RawRecord]) -> Vec<ColumnSpec> {
    let width = records.iter().map(RawRecord::trimmed_len).max().unwrap_or(0);
    (0..width).map(ColumnSpec::positional).collect()
}

/// Time column first, then frame index
fn select_timebase(columns: &[ColumnSpec]) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.role == ColumnRole::Time)
        .or_else(|| columns.iter().position(|c| c.role == ColumnRole::FrameIndex))
}

/// Per-row key: the timebase value, or the row ordinal
fn row_keys(
    rows: &[Vec<Option<f64>>],
    records: &[RawRecord],
    columns: &[ColumnSpec],
    timebase_idx: Option<usize>,
) -> Result<Vec<f64>> {
    let Some(idx) = timebase_idx else {
        return Ok((0..rows.len()).map(|i| i as f64).collect());
    };

    let name = columns[idx].name.as_str();
    let mut keys: Vec<f64> = Vec::with_capacity(rows.len());
    for (row, record) in rows.iter().zip(records) {
        let key = row[idx].ok_or_else(|| {
            MotionError::malformed_row(record.line, Some(name), "missing timebase value")
        })?;
        if let Some(prev) = keys.last() {
            if key <= *prev {
                return Err(MotionError::malformed_row(
                    record.line,
                    Some(name),
                    format!("timebase must be strictly increasing: {key} after {prev}"),
                ));
            }
        }
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ChannelSet> {
        TabularParser::default().parse_str(text, "test.csv")
    }

    #[test]
    fn test_parse_basic_table() {
        let set = parse("time,x,y,z\n0,1,2,3\n0.1,1.5,2.5,3.5\n0.2,2,3,4\n").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.row_count, 3);
        assert_eq!(set.timebase.as_ref().unwrap().column, "time");
        for channel in set.iter() {
            assert_eq!(channel.len(), 3);
        }
        assert_eq!(set.get("y").unwrap().values(), vec![2.0, 2.5, 3.0]);
        assert_eq!(set.get("z").unwrap().timestamps(), vec![0.0, 0.1, 0.2]);
    }

    #[test]
    fn test_unit_suffix_stripped_and_converted() {
        let set = parse("Time (s),X (ft),Yaw (deg)\n0,10,90\n1,20,180\n").unwrap();
        let x = set.get("X").unwrap();
        assert_eq!(x.unit.as_deref(), Some("m"));
        assert!((x.values()[0] - 3.048).abs() < 1e-12);
        assert_eq!(set.get("Yaw").unwrap().unit.as_deref(), Some("deg"));
        assert_eq!(set.get("Yaw").unwrap().values(), vec![90.0, 180.0]);
    }

    #[test]
    fn test_millisecond_time_converted_to_seconds() {
        let set = parse("time (ms),speed\n0,1\n500,2\n").unwrap();
        assert_eq!(set.get("speed").unwrap().timestamps(), vec![0.0, 0.5]);
    }

    #[test]
    fn test_trailing_commas_truncated() {
        let set = parse("time,x,\n0,1,,\n1,2,\n").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("x").unwrap().values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_blank_lines_and_mixed_numbers() {
        let set = parse("\ntime,x\n\n000,1e2\n\n0.5,+0.25\n").unwrap();
        assert_eq!(set.get("x").unwrap().values(), vec![100.0, 0.25]);
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = parse("time,x,y\n0,1,2\n1,2\n").unwrap_err();
        match err {
            MotionError::MalformedRow { row, message, .. } => {
                assert_eq!(row, 3);
                assert!(message.contains("expected 3 fields, got 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_non_empty_field_is_malformed() {
        let err = parse("time,x\n0,1,9\n").unwrap_err();
        assert!(matches!(err, MotionError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn test_strict_numeric_failure_names_column() {
        let err = parse("time,pitch\n0,1\n1,abc\n").unwrap_err();
        match err {
            MotionError::MalformedRow { row, column, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column.as_deref(), Some("pitch"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tolerant_mode_nulls_field() {
        let parser = TabularParser::new(ParseConfig {
            numeric_mode: NumericMode::Tolerant,
            ..Default::default()
        });
        let set = parser.parse_str("time,pitch\n0,1\n1,abc\n2,3\n", "t").unwrap();
        let pitch = set.get("pitch").unwrap();
        assert_eq!(pitch.timestamps(), vec![0.0, 2.0]);
        assert_eq!(set.get("time").unwrap().len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(MotionError::EmptyInput { .. })));
        assert!(matches!(
            parse("time,x\n\n"),
            Err(MotionError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_non_increasing_time_rejected() {
        let err = parse("time,x\n0,1\n0,2\n").unwrap_err();
        match err {
            MotionError::MalformedRow { row, column, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column.as_deref(), Some("time"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_frame_column_keys_channels() {
        let set = parse("frame,yaw\n10,1\n11,2\n").unwrap();
        let timebase = set.timebase.as_ref().unwrap();
        assert_eq!(timebase.role, ColumnRole::FrameIndex);
        assert_eq!(set.get("yaw").unwrap().timestamps(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_no_timebase_uses_row_ordinal() {
        let set = parse("a,b\n5,6\n7,8\n").unwrap();
        assert!(set.timebase.is_none());
        assert_eq!(set.get("b").unwrap().timestamps(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_auto_detects_headerless_input() {
        let set = parse("0,1\n1,2\n").unwrap();
        assert_eq!(set.names(), vec!["column_1", "column_2"]);
        assert_eq!(set.row_count, 2);
    }

    #[test]
    fn test_explicit_header() {
        let parser = TabularParser::new(ParseConfig {
            header: HeaderMode::Explicit(vec!["time".into(), "yaw".into()]),
            ..Default::default()
        });
        let set = parser.parse_str("0,10\n1,20\n", "t").unwrap();
        assert_eq!(set.get("yaw").unwrap().values(), vec![10.0, 20.0]);
        assert_eq!(set.timebase.unwrap().column, "time");
    }

    #[test]
    fn test_parse_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, "time,x\n0,1\n").unwrap();
        let set = TabularParser::default().parse_path(&path).unwrap();
        assert_eq!(set.source_name, "run.csv");
    }

    #[test]
    fn test_generated_tables_yield_equal_length_channels() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let rows = rng.random_range(1..50);
            let mut text = String::from("time,x,y,z,rot_z,speed\n");
            let mut t = 0.0;
            for _ in 0..rows {
                t += rng.random_range(0.001..1.0);
                let values: Vec<String> = (0..5)
                    .map(|_| format!("{:e}", rng.random_range(-1e3..1e3)))
                    .collect();
                text.push_str(&format!("{t},{}\n", values.join(",")));
            }

            let set = parse(&text).unwrap();
            assert_eq!(set.row_count, rows);
            assert!(set.iter().all(|c| c.len() == rows));
        }
    }
}
