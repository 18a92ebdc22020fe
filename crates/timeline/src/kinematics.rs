//! EDR path integration
//!
//! Speed and yaw rate are integrated into a planar path. Within each interval the
//! acceleration and yaw acceleration are constant; displacement is projected on
//! the midpoint heading of each step.

use std::collections::BTreeMap;

use contracts::{AxisRole, EdrConfig, EdrSample, MotionError, MotionSample, Result};
use tracing::{debug, instrument};

/// Planar integration state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarState {
    pub x: f64,
    pub y: f64,
    /// Heading, radians
    pub psi: f64,
    /// Speed, m/s
    pub v: f64,
    /// Yaw rate, rad/s
    pub r: f64,
}

/// Advance the state by `dt` under constant acceleration `a` and yaw acceleration `rdot`
pub fn integrate_step(state: PlanarState, dt: f64, a: f64, rdot: f64) -> PlanarState {
    let psi_next = state.psi + state.r * dt + 0.5 * rdot * dt * dt;
    let r_next = state.r + rdot * dt;

    let ds = state.v * dt + 0.5 * a * dt * dt;
    let v_next = state.v + a * dt;

    let psi_mid = 0.5 * (state.psi + psi_next);
    PlanarState {
        x: state.x + ds * psi_mid.cos(),
        y: state.y + ds * psi_mid.sin(),
        psi: psi_next,
        v: v_next,
        r: r_next,
    }
}

/// Kinematic bicycle estimate of yaw rate (rad/s) from the steering wheel angle
///
/// `speed / wheelbase * tan(radians(steering_wheel_deg / steering_ratio))`
pub fn estimate_yaw_rate_from_steering(
    speed: f64,
    steering_wheel_deg: f64,
    wheelbase: f64,
    steering_ratio: f64,
) -> Result<f64> {
    if wheelbase.is_nan() || wheelbase <= 0.0 {
        return Err(MotionError::invalid_argument(
            "wheelbase",
            format!("must be > 0, got {wheelbase}"),
        ));
    }
    if steering_ratio.is_nan() || steering_ratio <= 0.0 {
        return Err(MotionError::invalid_argument(
            "steering_ratio",
            format!("must be > 0, got {steering_ratio}"),
        ));
    }
    if !speed.is_finite() || !steering_wheel_deg.is_finite() {
        return Err(MotionError::invalid_argument(
            "speed/steering",
            "values must be finite",
        ));
    }
    let road_wheel = (steering_wheel_deg / steering_ratio).to_radians();
    Ok(speed / wheelbase * road_wheel.tan())
}

/// Integrate EDR samples into keyed poses
///
/// Frame 0 holds the initial pose; interval `[t0, t1]` produces keys
/// `round(t0 * fps) + 1 ..= round(t0 * fps) + steps` with at least one step.
/// Non-forward intervals are skipped. A final key sits at the last sample time.
/// Samples carry `speed` (m/s) and `yaw_rate` (rad/s) channels.
///
/// # Errors
/// `InvalidArgument` with fewer than two samples, a non-finite value or a
/// non-positive frame rate.
#[instrument(name = "edr_integrate", skip(samples, config), fields(samples = samples.len()))]
pub fn integrate_path(
    samples: &[EdrSample],
    config: &EdrConfig,
    frame_rate: f64,
) -> Result<Vec<MotionSample>> {
    if samples.len() < 2 {
        return Err(MotionError::invalid_argument(
            "samples",
            "at least two data points are required",
        ));
    }
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(MotionError::invalid_argument(
            "frame_rate",
            format!("must be > 0, got {frame_rate}"),
        ));
    }
    if let Some(idx) = samples
        .iter()
        .position(|s| !(s.time.is_finite() && s.speed.is_finite() && s.yaw_rate.is_finite()))
    {
        return Err(MotionError::invalid_argument(
            "samples",
            format!("non-finite value at index {idx}"),
        ));
    }

    let speed_factor = config.speed_unit.to_mps_factor();
    let yaw_factor = if config.yaw_rate_in_degrees {
        1.0_f64.to_radians()
    } else {
        1.0
    };
    let time: Vec<f64> = samples.iter().map(|s| s.time).collect();
    let speed: Vec<f64> = samples.iter().map(|s| s.speed * speed_factor).collect();
    let yaw_rate: Vec<f64> = samples.iter().map(|s| s.yaw_rate * yaw_factor).collect();

    let to_frame = |t: f64| (t * frame_rate).round() as i64;
    let pose = config.initial_pose;
    let mut state = PlanarState {
        x: pose.x,
        y: pose.y,
        psi: pose.heading_deg.to_radians(),
        v: speed[0],
        r: yaw_rate[0],
    };

    let mut keys: BTreeMap<i64, PlanarState> = BTreeMap::new();
    keys.insert(0, state);
    let mut last_keyed = 0;

    for i in 0..samples.len() - 1 {
        let interval = time[i + 1] - time[i];
        if interval <= 0.0 {
            debug!(index = i, "skipped non-forward interval");
            continue;
        }
        let f0 = to_frame(time[i]);
        let f1 = to_frame(time[i + 1]);
        let steps = (f1 - f0).max(1);
        let dt = interval / steps as f64;

        state.v = speed[i];
        state.r = yaw_rate[i];
        let a = (speed[i + 1] - speed[i]) / interval;
        let rdot = (yaw_rate[i + 1] - yaw_rate[i]) / interval;

        for step in 0..steps {
            state = integrate_step(state, dt, a, rdot);
            let frame = f0 + step + 1;
            keys.insert(frame, state);
            last_keyed = last_keyed.max(frame);
        }
    }

    let final_frame = to_frame(time[time.len() - 1]).max(last_keyed);
    keys.insert(final_frame, state);

    debug!(keys = keys.len(), final_frame, "integrated EDR path");
    Ok(keys
        .into_iter()
        .map(|(frame, s)| {
            let mut sample = MotionSample::new(frame, frame as f64 / frame_rate);
            sample.position = [s.x, s.y, 0.0];
            sample.rotation.set(AxisRole::Z, Some(s.psi));
            sample.channels.insert("speed".to_string(), s.v);
            sample.channels.insert("yaw_rate".to_string(), s.r);
            sample
        })
        .collect())
}
