//! # Rigging
//!
//! Helper-driven orientation.
//!
//! Responsibilities:
//! - Axis inference: helper names -> X/Y/Z bindings, with ambiguity and
//!   duplicate warnings
//! - Rotation reconstruction: per-axis curves from bound helper channels
//! - Euler <-> axis-angle conversion
//! - Keyframing samples onto a host-scene object
//!
//! ## Usage Example
//!
//! ```ignore
//! use rigging::{infer, reconstruct};
//! use contracts::{AngleUnit, RotationKeywordTable};
//!
//! let report = infer(["Front_Left_Camber", "Body_Pitch"], &RotationKeywordTable::default());
//! let built = builder.build_keyed(&helpers, Timing::FrameRate(30.0))?;
//! let mut samples = built.samples;
//! let curves = reconstruct(&samples, &built.keys, &report.sources, &helpers, AngleUnit::Degrees)?;
//! curves.apply(&mut samples)?;
//! ```

mod inference;
mod orientation;
mod reconstruct;
mod scene;

pub use inference::{belongs_to_vehicle, infer, matching_axes, normalize_root_name, vehicle_sources};
pub use orientation::{axis_angle_to_euler, euler_to_axis_angle, AxisAngle, IDENTITY_AXIS};
pub use reconstruct::{reconstruct, AxisCurve, RotationCurves};
pub use scene::{apply_to_target, KeyframeOptions, RecordingTarget};
