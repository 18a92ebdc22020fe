//! ExportRecord - Exporter input row
//!
//! A denormalised flat row built from one `MotionSample`, transient, one per output line.

use serde::Serialize;

use crate::{AxisAngles, AxisRole, MotionSample};

/// Flat output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub frame: i64,
    pub time: f64,
    pub position: [f64; 3],
    pub orientation: AxisAngles,
    /// Auxiliary channels in column order
    pub extras: Vec<(String, Option<f64>)>,
}

impl ExportRecord {
    /// Flatten a sample against a fixed list of extra column names
    ///
    /// Extras the sample does not carry are `None`.
    pub fn from_sample(sample: &MotionSample, extra_columns: &[String]) -> Self {
        Self {
            frame: sample.frame,
            time: sample.time,
            position: sample.position,
            orientation: sample.rotation,
            extras: extra_columns
                .iter()
                .map(|name| (name.clone(), sample.channels.get(name).copied()))
                .collect(),
        }
    }
}

/// Column layout shared by every record of one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordLayout {
    /// Rotation axes written at all (in X, Y, Z order)
    pub rotation_axes: Vec<AxisRole>,
    /// Auxiliary channel names, sorted
    pub extra_columns: Vec<String>,
}

impl RecordLayout {
    /// Derive the layout from a sample sequence
    ///
    /// A rotation axis is written when at least one sample carries it; the extra
    /// columns are the union of every sample's channel names.
    pub fn from_samples(samples: &[MotionSample]) -> Self {
        let rotation_axes = AxisRole::ALL
            .into_iter()
            .filter(|axis| samples.iter().any(|s| s.rotation.get(*axis).is_some()))
            .collect();

        let mut extra_columns: Vec<String> = samples
            .iter()
            .flat_map(|s| s.channels.keys().cloned())
            .collect();
        extra_columns.sort();
        extra_columns.dedup();

        Self {
            rotation_axes,
            extra_columns,
        }
    }

    pub fn records<'a>(
        &'a self,
        samples: &'a [MotionSample],
    ) -> impl Iterator<Item = ExportRecord> + 'a {
        samples
            .iter()
            .map(|sample| ExportRecord::from_sample(sample, &self.extra_columns))
    }
}
