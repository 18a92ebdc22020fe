//! # Ingestion
//!
//! `TabularParser` turns delimited motion tables into a `ChannelSet`. The
//! profile readers cover the looser layouts: EDR speed tables, HVE variable
//! output and headerless xyz/roll/pitch/yaw files.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::TabularParser;
//! use contracts::ParseConfig;
//!
//! let parser = TabularParser::new(ParseConfig::default());
//! let channels = parser.parse_str("time,x\n0,1\n0.1,2\n", "inline")?;
//! assert_eq!(channels.row_count, 2);
//! ```

mod edr;
mod header;
mod numeric;
mod parser;
mod reader;
mod variable_output;
mod xyzrpy;

// Re-exports
pub use contracts::{ChannelSet, EdrSample, EdrTable, MotionError, Result};
pub use edr::{parse_edr_path, parse_edr_str};
pub use header::{columns_from_header, ColumnSpec};
pub use numeric::{parse_field, parse_number, Field};
pub use parser::TabularParser;
pub use reader::{read_records, RawRecord};
pub use variable_output::{parse_variable_output_path, parse_variable_output_str};
pub use xyzrpy::{parse_xyzrpy_path, parse_xyzrpy_str};
