//! Resampling / interpolation
//!
//! Aligns a channel onto arbitrary target timestamps. Inside the channel's range
//! values are interpolated linearly between bracketing samples; outside it they
//! hold the nearest boundary value.

use contracts::{Channel, ChannelSample, MotionError, ResamplePolicy, Result};

/// Resample `channel` at every target timestamp (linear, clamped)
///
/// # Errors
/// `EmptyChannel` when the channel has no samples.
pub fn resample(channel: &Channel, targets: &[f64]) -> Result<Vec<f64>> {
    let samples = channel.samples();
    if samples.is_empty() {
        return Err(MotionError::empty_channel(&channel.name));
    }
    Ok(targets.iter().map(|t| interpolate(samples, *t)).collect())
}

/// Sample `channel` at `t` under a policy
///
/// `None` only for `Exact` with no sample at `t`, or an empty channel.
pub fn sample_at(channel: &Channel, t: f64, policy: ResamplePolicy) -> Option<f64> {
    let samples = channel.samples();
    if samples.is_empty() {
        return None;
    }
    match policy {
        ResamplePolicy::Exact => channel.value_at(t),
        ResamplePolicy::Nearest => Some(hold(samples, t)),
        ResamplePolicy::Linear => Some(interpolate(samples, t)),
    }
}

/// Index of the first sample with timestamp > t
fn upper_bound(samples: &[ChannelSample], t: f64) -> usize {
    samples.partition_point(|s| s.t <= t)
}

/// Value at or before `t`, clamped to the first sample
fn hold(samples: &[ChannelSample], t: f64) -> f64 {
    let idx = upper_bound(samples, t);
    samples[idx.saturating_sub(1)].value
}

/// Linear interpolation with boundary clamp; exact at sample timestamps
fn interpolate(samples: &[ChannelSample], t: f64) -> f64 {
    let idx = upper_bound(samples, t);
    if idx == 0 {
        return samples[0].value;
    }
    let before = samples[idx - 1];
    if before.t == t || idx == samples.len() {
        return before.value;
    }
    let after = samples[idx];
    let ratio = (t - before.t) / (after.t - before.t);
    before.value + (after.value - before.value) * ratio
}
