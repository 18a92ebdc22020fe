//! # Timeline
//!
//! Puts channels on a common frame axis and builds the `MotionSample`
//! sequence from them. Also integrates EDR speed/yaw-rate tables into a
//! planar path.
//!
//! ## Usage Example
//!
//! ```ignore
//! use timeline::ModelBuilder;
//! use contracts::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! let builder = ModelBuilder::new(config.timeline, config.units);
//! let samples = builder.build_default(&channels)?;
//! ```

mod builder;
mod kinematics;
mod resample;

pub use builder::{angle_unit, KeyedSamples, ModelBuilder, Timing};
pub use kinematics::{estimate_yaw_rate_from_steering, integrate_path, integrate_step, PlanarState};
pub use resample::{resample, sample_at};
