//! Channel - Tabular Parser output
//!
//! A named scalar time series. Timestamps are strictly increasing.

use serde::{Deserialize, Serialize};

use crate::{ColumnRole, MotionError, Result};

/// One `(timestamp, value)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSample {
    pub t: f64,
    pub value: f64,
}

/// Named scalar time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Base column name (unit decoration stripped)
    pub name: String,

    /// Unit after normalisation (`m`, `m/s`, `deg`, ...)
    #[serde(default)]
    pub unit: Option<String>,

    /// Role inferred from the column name
    pub role: ColumnRole,

    samples: Vec<ChannelSample>,
}

impl Channel {
    /// Create an empty channel; role is classified from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let role = ColumnRole::classify(&name);
        Self {
            name,
            unit: None,
            role,
            samples: Vec::new(),
        }
    }

    /// Builder: attach a unit label
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Build a channel from pairs, checking timestamp order
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self> {
        let mut channel = Self::new(name);
        for (t, value) in pairs {
            channel.push(t, value)?;
        }
        Ok(channel)
    }

    /// Append a sample; `t` must be finite and greater than the last timestamp
    pub fn push(&mut self, t: f64, value: f64) -> Result<()> {
        if !t.is_finite() {
            return Err(MotionError::invalid_argument(
                &self.name,
                format!("timestamp {t} is not finite"),
            ));
        }
        if let Some(last) = self.samples.last() {
            if t <= last.t {
                return Err(MotionError::invalid_argument(
                    &self.name,
                    format!(
                        "timestamps must be strictly increasing: {t} after {}",
                        last.t
                    ),
                ));
            }
        }
        self.samples.push(ChannelSample { t, value });
        Ok(())
    }

    pub fn samples(&self) -> &[ChannelSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// First and last timestamp
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.t, self.samples.last()?.t))
    }

    /// Value sampled exactly at `t`
    pub fn value_at(&self, t: f64) -> Option<f64> {
        self.samples
            .binary_search_by(|s| s.t.total_cmp(&t))
            .ok()
            .map(|idx| self.samples[idx].value)
    }

    /// Scale every value in place (unit conversion)
    pub fn scale_values(&mut self, factor: f64) {
        for sample in &mut self.samples {
            sample.value *= factor;
        }
    }
}

/// Which column keys the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timebase {
    pub role: ColumnRole,
    pub column: String,
}

/// Channels parsed from one table, in header order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSet {
    /// Name of the input (file name or caller label), used in error context
    pub source_name: String,

    channels: Vec<Channel>,

    /// Column whose values keyed every channel's timestamps (`None`: row ordinal)
    pub timebase: Option<Timebase>,

    /// Number of data rows the set was built from
    pub row_count: usize,
}

impl ChannelSet {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Default::default()
        }
    }

    /// Add a channel; a channel with the same name is replaced
    pub fn insert(&mut self, channel: Channel) {
        match self.channels.iter_mut().find(|c| c.name == channel.name) {
            Some(existing) => *existing = channel,
            None => self.channels.push(channel),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// First channel carrying the given role
    pub fn by_role(&self, role: ColumnRole) -> Option<&Channel> {
        self.channels.iter().find(|c| c.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
