//! EdrTable - EDR speed table profile output

use serde::{Deserialize, Serialize};

/// One EDR sample, in file units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdrSample {
    pub time: f64,
    pub speed: f64,
    pub yaw_rate: f64,
}

/// Parsed EDR table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdrTable {
    pub source_name: String,
    pub samples: Vec<EdrSample>,
    /// Amount subtracted from every time when the first time was negative
    pub time_offset: f64,
    /// Rows skipped as non-numeric
    pub skipped_rows: usize,
}

impl EdrTable {
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }
}
