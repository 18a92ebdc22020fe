//! Motion Sample Model builder
//!
//! `ChannelSet` -> ordered `MotionSample`s on a canonical frame axis.
//!
//! Frame axis resolution:
//! - a frame-index channel is used directly
//! - otherwise the union of channel timestamps, frames at `round(t * frame_rate)`
//! - explicit timestamps override both
//!
//! Every key yields a sample. A frame already taken by the previous key moves
//! to the next free frame.

use std::collections::BTreeSet;

use contracts::{
    AngleUnit, AxisRole, Channel, ChannelSet, ColumnRole, MotionError, MotionSample,
    ResamplePolicy, Result, TimelineConfig, UnitConfig,
};
use tracing::{debug, instrument};

use crate::resample::sample_at;

/// How the canonical timeline is obtained
#[derive(Debug, Clone, PartialEq)]
pub enum Timing {
    /// Derive keys from the set's timebase at this frame rate (Hz)
    FrameRate(f64),
    /// Use these timestamps (seconds, strictly increasing); frame i is the i-th timestamp
    Explicit(Vec<f64>),
}

/// One resolved timeline key
#[derive(Debug, Clone, Copy, PartialEq)]
struct Key {
    frame: i64,
    /// Output time, seconds
    time: f64,
    /// Lookup position in the channels' key space
    lookup: f64,
}

/// Built samples plus the key each one was looked up at
///
/// `keys[i]` is in the source channels' key space (the parsed timebase values),
/// which differs from `samples[i].time` for frame-keyed or shifted tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedSamples {
    pub samples: Vec<MotionSample>,
    pub keys: Vec<f64>,
}

/// Motion Sample Model builder
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    timeline: TimelineConfig,
    units: UnitConfig,
}

impl ModelBuilder {
    pub fn new(timeline: TimelineConfig, units: UnitConfig) -> Self {
        Self { timeline, units }
    }

    /// Builder: override the resample policy
    pub fn with_policy(mut self, policy: ResamplePolicy) -> Self {
        self.timeline.resample_policy = policy;
        self
    }

    /// Build with the configured frame rate
    pub fn build_default(&self, set: &ChannelSet) -> Result<Vec<MotionSample>> {
        self.build(set, Timing::FrameRate(self.timeline.frame_rate))
    }

    /// Build the ordered sample sequence
    ///
    /// # Errors
    /// - `NoTimebase` when the set has neither a time nor a frame-index column
    ///   (explicit timestamps excepted)
    /// - `InvalidArgument` on a non-positive frame rate or non-increasing explicit timestamps
    pub fn build(&self, set: &ChannelSet, timing: Timing) -> Result<Vec<MotionSample>> {
        self.build_keyed(set, timing).map(|built| built.samples)
    }

    /// `build`, keeping each sample's lookup key for later channel lookups
    #[instrument(name = "model_build", skip(self, set, timing), fields(source = %set.source_name))]
    pub fn build_keyed(&self, set: &ChannelSet, timing: Timing) -> Result<KeyedSamples> {
        let keys = match timing {
            Timing::FrameRate(rate) => {
                check_frame_rate(rate)?;
                self.derived_keys(set, rate)?
            }
            Timing::Explicit(times) => explicit_keys(set, &times, self.timeline.frame_rate)?,
        };

        let slots = SlotMap::new(set);
        let policy = self.timeline.resample_policy;
        let samples: Vec<MotionSample> = keys
            .iter()
            .map(|key| self.populate(key, &slots, policy))
            .collect();

        metrics::histogram!("hve_motion_samples_built").record(samples.len() as f64);
        debug!(samples = samples.len(), ?policy, "built motion samples");
        Ok(KeyedSamples {
            samples,
            keys: keys.iter().map(|k| k.lookup).collect(),
        })
    }

    /// Keys from the set's own timebase
    fn derived_keys(&self, set: &ChannelSet, rate: f64) -> Result<Vec<Key>> {
        let time_keyed = set
            .timebase
            .as_ref()
            .is_some_and(|tb| tb.role == ColumnRole::Time);

        if let Some(frames) = set.by_role(ColumnRole::FrameIndex) {
            let offset = self.time_offset(frames.samples().first().map(|s| s.t), time_keyed);
            let mut keys: Vec<Key> = Vec::with_capacity(frames.len());
            for sample in frames.samples() {
                let frame = next_frame(&keys, sample.value.round() as i64);
                let time = if time_keyed {
                    sample.t - offset
                } else {
                    frame as f64 / rate
                };
                keys.push(Key {
                    frame,
                    time,
                    lookup: sample.t,
                });
            }
            return Ok(keys);
        }

        if !time_keyed {
            return Err(MotionError::NoTimebase {
                available: set.names(),
            });
        }

        let union: BTreeSet<u64> = set
            .iter()
            .flat_map(|c| c.samples().iter().map(|s| ordered_bits(s.t)))
            .collect();
        let times: Vec<f64> = union.into_iter().map(from_ordered_bits).collect();
        let offset = self.time_offset(times.first().copied(), true);

        let mut keys: Vec<Key> = Vec::with_capacity(times.len());
        for t in times {
            let time = t - offset;
            let frame = next_frame(&keys, (time * rate).round() as i64);
            keys.push(Key {
                frame,
                time,
                lookup: t,
            });
        }
        Ok(keys)
    }

    /// Shift applied to times when a negative start must land on 0
    fn time_offset(&self, first: Option<f64>, time_keyed: bool) -> f64 {
        match first {
            Some(t) if time_keyed && self.timeline.shift_negative_time && t < 0.0 => t,
            _ => 0.0,
        }
    }

    fn populate(&self, key: &Key, slots: &SlotMap<'_>, policy: ResamplePolicy) -> MotionSample {
        let mut sample = MotionSample::new(key.frame, key.time);

        for (idx, channel) in slots.position.iter().enumerate() {
            if let Some(value) = channel.and_then(|c| sample_at(c, key.lookup, policy)) {
                sample.position[idx] = value * self.units.position_scale;
            }
        }
        for (axis, channel) in &slots.rotation {
            let unit = angle_unit(channel, self.units.angles);
            let value = sample_at(channel, key.lookup, policy).map(|v| unit.to_radians(v));
            sample.rotation.set(*axis, value);
        }
        for channel in &slots.extras {
            if let Some(value) = sample_at(channel, key.lookup, policy) {
                sample.channels.insert(channel.name.clone(), value);
            }
        }
        sample
    }
}

/// Channels grouped by the slot they fill
struct SlotMap<'a> {
    position: [Option<&'a Channel>; 3],
    rotation: Vec<(AxisRole, &'a Channel)>,
    extras: Vec<&'a Channel>,
}

impl<'a> SlotMap<'a> {
    /// The first channel of each position/rotation role fills the slot; later
    /// channels of the same role become auxiliary
    fn new(set: &'a ChannelSet) -> Self {
        let mut slots = SlotMap {
            position: [None; 3],
            rotation: Vec::new(),
            extras: Vec::new(),
        };
        for channel in set.iter() {
            if channel.role.is_timebase() {
                continue;
            }
            if let Some(idx) = channel.role.position_index() {
                if slots.position[idx].is_none() {
                    slots.position[idx] = Some(channel);
                    continue;
                }
            }
            if let Some(axis) = channel.role.rotation_axis() {
                if slots.rotation.iter().all(|(a, _)| *a != axis) {
                    slots.rotation.push((axis, channel));
                    continue;
                }
            }
            slots.extras.push(channel);
        }
        slots
    }
}

/// `candidate`, or one past the previous key's frame when that is already taken
fn next_frame(keys: &[Key], candidate: i64) -> i64 {
    match keys.last() {
        Some(last) if candidate <= last.frame => {
            debug!(candidate, frame = last.frame + 1, "frame taken, moved to next free frame");
            last.frame + 1
        }
        _ => candidate,
    }
}

/// Explicit `deg`/`rad` header unit overrides the configured default
pub fn angle_unit(channel: &Channel, default: AngleUnit) -> AngleUnit {
    channel
        .unit
        .as_deref()
        .and_then(AngleUnit::from_label)
        .unwrap_or(default)
}

fn check_frame_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(MotionError::invalid_argument(
            "frame_rate",
            format!("must be finite and > 0, got {rate}"),
        ));
    }
    Ok(())
}

/// Keys for caller-supplied timestamps
///
/// Time-keyed sets are looked up at the timestamp itself; frame-keyed and
/// row-ordinal sets at `t * frame_rate`.
fn explicit_keys(set: &ChannelSet, times: &[f64], rate: f64) -> Result<Vec<Key>> {
    check_frame_rate(rate)?;
    if let Some(pos) = times
        .windows(2)
        .position(|w| !(w[1] > w[0]))
        .or_else(|| times.iter().position(|t| !t.is_finite()))
    {
        return Err(MotionError::invalid_argument(
            "timestamps",
            format!("must be finite and strictly increasing (index {pos})"),
        ));
    }

    let time_keyed = set
        .timebase
        .as_ref()
        .is_some_and(|tb| tb.role == ColumnRole::Time);
    Ok(times
        .iter()
        .enumerate()
        .map(|(idx, t)| Key {
            frame: idx as i64,
            time: *t,
            lookup: if time_keyed { *t } else { t * rate },
        })
        .collect())
}

/// Order-preserving bit pattern so timestamps can live in a `BTreeSet`
fn ordered_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

fn from_ordered_bits(bits: u64) -> f64 {
    if bits >> 63 == 1 {
        f64::from_bits(bits & !(1 << 63))
    } else {
        f64::from_bits(!bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{first_order_violation, Timebase};

    fn time_set(channels: Vec<Channel>) -> ChannelSet {
        let mut set = ChannelSet::new("test");
        set.timebase = Some(Timebase {
            role: ColumnRole::Time,
            column: "time".into(),
        });
        for channel in channels {
            set.insert(channel);
        }
        set
    }

    fn ch(name: &str, pairs: &[(f64, f64)]) -> Channel {
        Channel::from_pairs(name, pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_position_only_table() {
        let t = [(0.0, 0.0), (0.1, 0.1), (0.2, 0.2)];
        let set = time_set(vec![
            ch("time", &t),
            ch("x", &[(0.0, 1.0), (0.1, 2.0), (0.2, 3.0)]),
            ch("y", &[(0.0, 4.0), (0.1, 5.0), (0.2, 6.0)]),
            ch("z", &[(0.0, 7.0), (0.1, 8.0), (0.2, 9.0)]),
        ]);
        let samples = ModelBuilder::default().build_default(&set).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.iter().map(|s| s.frame).collect::<Vec<_>>(), vec![0, 3, 6]);
        assert_eq!(samples[1].position, [2.0, 5.0, 8.0]);
        for sample in &samples {
            assert!(sample.rotation.present_axes().is_empty());
            assert_eq!(sample.rotation.or_rest(), [0.0; 3]);
            assert!(sample.channels.is_empty());
        }
    }

    #[test]
    fn test_no_timebase() {
        let mut set = ChannelSet::new("t");
        set.insert(ch("speed", &[(0.0, 1.0)]));
        let err = ModelBuilder::default().build_default(&set).unwrap_err();
        match err {
            MotionError::NoTimebase { available } => assert_eq!(available, vec!["speed"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_frame_column_used_directly() {
        let set = time_set(vec![
            ch("time", &[(0.0, 0.0), (0.5, 0.5)]),
            ch("frame", &[(0.0, 100.0), (0.5, 101.0)]),
            ch("yaw", &[(0.0, 90.0), (0.5, 180.0)]),
        ]);
        let samples = ModelBuilder::default().build_default(&set).unwrap();
        assert_eq!(samples[0].frame, 100);
        assert_eq!(samples[1].frame, 101);
        assert_eq!(samples[1].time, 0.5);
        let yaw = samples[1].rotation.get(AxisRole::Z).unwrap();
        assert!((yaw - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_frame_keyed_set_time_from_rate() {
        let mut set = ChannelSet::new("t");
        set.timebase = Some(Timebase {
            role: ColumnRole::FrameIndex,
            column: "frame".into(),
        });
        set.insert(ch("frame", &[(3.0, 3.0), (4.0, 4.0)]));
        set.insert(ch("x", &[(3.0, 1.0), (4.0, 2.0)]));
        let samples = ModelBuilder::default().build_default(&set).unwrap();
        assert_eq!(samples[0].frame, 3);
        assert!((samples[0].time - 0.1).abs() < 1e-12);
        assert_eq!(samples[1].position[0], 2.0);
    }

    #[test]
    fn test_union_of_mismatched_timestamps_nearest() {
        let set = time_set(vec![
            ch("x", &[(0.0, 0.0), (1.0, 10.0)]),
            ch("speed", &[(0.5, 5.0)]),
        ]);
        let builder = ModelBuilder::new(
            TimelineConfig {
                frame_rate: 10.0,
                ..Default::default()
            },
            UnitConfig::default(),
        );
        let samples = builder.build_default(&set).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].frame, 5);
        assert_eq!(samples[1].position[0], 0.0);
        assert_eq!(samples[0].channels["speed"], 5.0);
        assert_eq!(first_order_violation(&samples), None);
    }

    #[test]
    fn test_exact_policy_leaves_gaps() {
        let set = time_set(vec![
            ch("roll", &[(0.0, 0.0), (1.0, 90.0)]),
            ch("speed", &[(0.5, 5.0)]),
        ]);
        let builder = ModelBuilder::default().with_policy(ResamplePolicy::Exact);
        let samples = builder.build_default(&set).unwrap();
        assert_eq!(samples[1].rotation.get(AxisRole::X), None);
        assert!(!samples[0].channels.contains_key("speed"));
        assert_eq!(samples[1].channels["speed"], 5.0);
    }

    #[test]
    fn test_linear_policy_interpolates() {
        let set = time_set(vec![
            ch("x", &[(0.0, 0.0), (1.0, 10.0)]),
            ch("speed", &[(0.5, 5.0)]),
        ]);
        let builder = ModelBuilder::default().with_policy(ResamplePolicy::Linear);
        let samples = builder.build_default(&set).unwrap();
        assert_eq!(samples[1].position[0], 5.0);
    }

    #[test]
    fn test_dense_timestamps_keep_every_row() {
        let set = time_set(vec![ch(
            "x",
            &[(0.0, 0.0), (0.01, 1.0), (0.02, 2.0), (0.03, 3.0), (0.2, 4.0)],
        )]);
        let samples = ModelBuilder::default().build_default(&set).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(
            samples.iter().map(|s| s.frame).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 6]
        );
        assert_eq!(
            samples.iter().map(|s| s.position[0]).collect::<Vec<_>>(),
            vec![0.0, 1.0, 2.0, 3.0, 4.0]
        );
        assert_eq!(samples[1].time, 0.01);
        assert_eq!(first_order_violation(&samples), None);
    }

    #[test]
    fn test_fractional_frame_column_keeps_every_row() {
        let mut set = ChannelSet::new("t");
        set.timebase = Some(Timebase {
            role: ColumnRole::FrameIndex,
            column: "frame".into(),
        });
        set.insert(ch("frame", &[(1.2, 1.2), (1.4, 1.4), (2.0, 2.0)]));
        set.insert(ch("x", &[(1.2, 5.0), (1.4, 6.0), (2.0, 7.0)]));
        let samples = ModelBuilder::default().build_default(&set).unwrap();
        assert_eq!(samples.iter().map(|s| s.frame).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(samples[1].position[0], 6.0);
        assert!((samples[2].time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_keyed_build_reports_lookup_keys() {
        let mut set = ChannelSet::new("t");
        set.timebase = Some(Timebase {
            role: ColumnRole::FrameIndex,
            column: "frame".into(),
        });
        set.insert(ch("frame", &[(0.0, 0.0), (30.0, 30.0)]));
        let built = ModelBuilder::default()
            .build_keyed(&set, Timing::FrameRate(30.0))
            .unwrap();
        assert_eq!(built.keys, vec![0.0, 30.0]);
        assert_eq!(built.samples[1].time, 1.0);

        let shifted = time_set(vec![ch("x", &[(-1.0, 0.0), (0.0, 1.0)])]);
        let builder = ModelBuilder::new(
            TimelineConfig {
                shift_negative_time: true,
                ..Default::default()
            },
            UnitConfig::default(),
        );
        let built = builder.build_keyed(&shifted, Timing::FrameRate(30.0)).unwrap();
        assert_eq!(built.keys, vec![-1.0, 0.0]);
        assert_eq!(built.samples[0].time, 0.0);
        assert_eq!(built.samples[1].time, 1.0);
    }

    #[test]
    fn test_explicit_timestamps() {
        let set = time_set(vec![ch("x", &[(0.0, 0.0), (10.0, 10.0)])]);
        let builder = ModelBuilder::default().with_policy(ResamplePolicy::Linear);
        let samples = builder
            .build(&set, Timing::Explicit(vec![0.0, 5.0, 20.0]))
            .unwrap();
        let xs: Vec<f64> = samples.iter().map(|s| s.position[0]).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
        assert_eq!(samples[2].frame, 2);

        let err = builder.build(&set, Timing::Explicit(vec![1.0, 1.0])).unwrap_err();
        assert!(matches!(err, MotionError::InvalidArgument { .. }));
    }

    #[test]
    fn test_radian_header_overrides_degree_default() {
        let mut yaw = ch("yaw", &[(0.0, 1.5)]);
        yaw.unit = Some("rad".into());
        let set = time_set(vec![yaw, ch("pitch", &[(0.0, 90.0)])]);
        let samples = ModelBuilder::default().build_default(&set).unwrap();
        assert_eq!(samples[0].rotation.get(AxisRole::Z), Some(1.5));
        let pitch = samples[0].rotation.get(AxisRole::Y).unwrap();
        assert!((pitch - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_position_scale_and_negative_shift() {
        let set = time_set(vec![ch("x", &[(-1.0, 10.0), (0.0, 20.0)])]);
        let builder = ModelBuilder::new(
            TimelineConfig {
                frame_rate: 10.0,
                shift_negative_time: true,
                ..Default::default()
            },
            UnitConfig {
                position_scale: 0.5,
                ..Default::default()
            },
        );
        let samples = builder.build_default(&set).unwrap();
        assert_eq!(samples[0].frame, 0);
        assert_eq!(samples[0].time, 0.0);
        assert_eq!(samples[1].frame, 10);
        assert_eq!(samples[1].position[0], 10.0);
    }

    #[test]
    fn test_ordered_bits_preserve_order() {
        let values = [-3.5, -0.0, 0.0, 1e-9, 2.0, 1e12];
        let bits: Vec<u64> = values.iter().map(|v| ordered_bits(*v)).collect();
        assert!(bits.windows(2).all(|w| w[0] <= w[1]));
        for v in values {
            assert_eq!(from_ordered_bits(ordered_bits(v)), v);
        }
    }
}
