//! Rotation Reconstruction
//!
//! Composes per-axis angle curves from bound helper channels. Driven axes follow
//! their helper (linear resampling at each sample's lookup key, clamped to the
//! helper's range). Undriven axes stay at rest pose 0 and are never written to samples.

use contracts::{
    AngleUnit, AxisRole, AxisSources, ChannelSet, MotionError, MotionSample, Result,
};
use timeline::{angle_unit, resample};
use tracing::{debug, instrument};

/// One axis' angle curve (radians), aligned to the sample sequence
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCurve {
    pub axis: AxisRole,
    /// Driving helper; `None` means rest pose
    pub source: Option<String>,
    pub values: Vec<f64>,
}

impl AxisCurve {
    pub fn is_driven(&self) -> bool {
        self.source.is_some()
    }
}

/// Full orientation curves over a frame range
#[derive(Debug, Clone, PartialEq)]
pub struct RotationCurves {
    pub frames: Vec<i64>,
    curves: [AxisCurve; 3],
}

impl RotationCurves {
    pub fn curve(&self, axis: AxisRole) -> &AxisCurve {
        &self.curves[axis.index()]
    }

    pub fn driven_axes(&self) -> Vec<AxisRole> {
        self.curves
            .iter()
            .filter(|c| c.is_driven())
            .map(|c| c.axis)
            .collect()
    }

    /// Euler XYZ at the i-th frame, rest pose for undriven axes
    pub fn euler_at(&self, i: usize) -> Option<[f64; 3]> {
        (i < self.frames.len()).then(|| {
            [
                self.curves[0].values[i],
                self.curves[1].values[i],
                self.curves[2].values[i],
            ]
        })
    }

    /// Write driven axes into the samples they were built from
    ///
    /// # Errors
    /// `InvalidArgument` when the samples do not match the curves' frames
    pub fn apply(&self, samples: &mut [MotionSample]) -> Result<()> {
        let frames_match = samples.len() == self.frames.len()
            && samples.iter().zip(&self.frames).all(|(s, f)| s.frame == *f);
        if !frames_match {
            return Err(MotionError::invalid_argument(
                "samples",
                "frame sequence differs from the reconstructed curves",
            ));
        }
        for curve in self.curves.iter().filter(|c| c.is_driven()) {
            for (sample, value) in samples.iter_mut().zip(&curve.values) {
                sample.rotation.set(curve.axis, Some(*value));
            }
        }
        Ok(())
    }
}

/// Reconstruct orientation curves for `samples`
///
/// `keys[i]` is where sample `i` sits in the helper channels' key space, as
/// returned by `ModelBuilder::build_keyed`. `helpers` holds one channel per
/// helper name; `angles` is the unit assumed for helper channels without an
/// explicit `deg`/`rad` annotation.
///
/// # Errors
/// - `InvalidArgument` when `keys` and `samples` differ in length, or a bound
///   helper has no channel
/// - `EmptyChannel` when a bound helper's channel has no samples
#[instrument(name = "rotation_reconstruct", skip_all, fields(samples = samples.len()))]
pub fn reconstruct(
    samples: &[MotionSample],
    keys: &[f64],
    sources: &AxisSources,
    helpers: &ChannelSet,
    angles: AngleUnit,
) -> Result<RotationCurves> {
    if keys.len() != samples.len() {
        return Err(MotionError::invalid_argument(
            "keys",
            format!("{} keys for {} samples", keys.len(), samples.len()),
        ));
    }

    let curve = |axis: AxisRole| -> Result<AxisCurve> {
        let Some(helper) = sources.get(axis) else {
            debug!(axis = %axis, "axis at rest pose");
            return Ok(AxisCurve {
                axis,
                source: None,
                values: vec![0.0; keys.len()],
            });
        };
        let channel = helpers.get(helper).ok_or_else(|| {
            MotionError::invalid_argument(helper, "bound helper has no animation channel")
        })?;
        let unit = angle_unit(channel, angles);
        let values = resample(channel, keys)?
            .into_iter()
            .map(|v| unit.to_radians(v))
            .collect();
        debug!(axis = %axis, helper, ?unit, "axis driven by helper");
        Ok(AxisCurve {
            axis,
            source: Some(helper.to_string()),
            values,
        })
    };

    Ok(RotationCurves {
        frames: samples.iter().map(|s| s.frame).collect(),
        curves: [curve(AxisRole::X)?, curve(AxisRole::Y)?, curve(AxisRole::Z)?],
    })
}
