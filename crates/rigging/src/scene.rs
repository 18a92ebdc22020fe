//! Host-scene adapter
//!
//! Writes location and rotation keys for each sample through `KeyframeTarget`.

use std::collections::BTreeMap;

use contracts::{KeyframeTarget, MotionSample};
use tracing::{debug, info, instrument};

/// Keyframing options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeOptions {
    /// Drop existing animation first
    pub clear_existing: bool,
    /// Duplicate the first pose at this frame when no key exists there
    pub pre_roll_frame: Option<i64>,
}

impl Default for KeyframeOptions {
    fn default() -> Self {
        Self {
            clear_existing: true,
            pre_roll_frame: Some(-1),
        }
    }
}

/// Key the samples onto `target`; returns the number of frames keyed
///
/// Rotation keys use rest pose 0 for undriven axes.
#[instrument(name = "keyframe_apply", skip_all, fields(object = %target.object_name()))]
pub fn apply_to_target<T: KeyframeTarget + ?Sized>(
    target: &mut T,
    samples: &[MotionSample],
    options: KeyframeOptions,
) -> usize {
    if options.clear_existing && target.has_animation() {
        debug!("cleared existing animation");
        target.clear_animation();
    }

    for sample in samples {
        target.insert_location_key(sample.frame, sample.position);
        target.insert_rotation_key(sample.frame, sample.rotation.or_rest());
    }
    let mut keyed = samples.len();

    if let (Some(pre_roll), Some(first)) = (options.pre_roll_frame, samples.first()) {
        if !target.has_key_at(pre_roll) {
            target.insert_location_key(pre_roll, first.position);
            target.insert_rotation_key(pre_roll, first.rotation.or_rest());
            keyed += 1;
        }
    }

    info!(frames = keyed, "keyed motion");
    keyed
}

/// In-memory `KeyframeTarget`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingTarget {
    pub name: String,
    pub locations: BTreeMap<i64, [f64; 3]>,
    pub rotations: BTreeMap<i64, [f64; 3]>,
}

impl RecordingTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Keyed frames, ascending
    pub fn frames(&self) -> Vec<i64> {
        let mut frames: Vec<i64> = self
            .locations
            .keys()
            .chain(self.rotations.keys())
            .copied()
            .collect();
        frames.sort_unstable();
        frames.dedup();
        frames
    }
}

impl KeyframeTarget for RecordingTarget {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn has_animation(&self) -> bool {
        !self.locations.is_empty() || !self.rotations.is_empty()
    }

    fn clear_animation(&mut self) {
        self.locations.clear();
        self.rotations.clear();
    }

    fn has_key_at(&self, frame: i64) -> bool {
        self.locations.contains_key(&frame) || self.rotations.contains_key(&frame)
    }

    fn insert_location_key(&mut self, frame: i64, location: [f64; 3]) {
        self.locations.insert(frame, location);
    }

    fn insert_rotation_key(&mut self, frame: i64, rotation: [f64; 3]) {
        self.rotations.insert(frame, rotation);
    }
}
