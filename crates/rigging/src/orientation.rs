//! Euler XYZ <-> axis-angle
//!
//! XYZ Euler order: the matrix is `Rz * Ry * Rx`.

use nalgebra::{Rotation3, Unit, UnitQuaternion, Vector3};

/// Axis written for a zero rotation
pub const IDENTITY_AXIS: [f64; 3] = [0.0, 1.0, 0.0];

/// Rotation as a unit axis and an angle in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    pub axis: [f64; 3],
    pub angle: f64,
}

impl AxisAngle {
    pub fn identity() -> Self {
        Self {
            axis: IDENTITY_AXIS,
            angle: 0.0,
        }
    }
}

/// Compose XYZ Euler angles (radians) into an axis-angle rotation
pub fn euler_to_axis_angle(euler: [f64; 3]) -> AxisAngle {
    let rotation = UnitQuaternion::from_euler_angles(euler[0], euler[1], euler[2]);
    match rotation.axis_angle() {
        Some((axis, angle)) => AxisAngle {
            axis: [axis.x, axis.y, axis.z],
            angle,
        },
        None => AxisAngle::identity(),
    }
}

/// Decompose an axis-angle rotation into XYZ Euler angles (radians)
///
/// A zero-length axis is the identity.
pub fn axis_angle_to_euler(rotation: AxisAngle) -> [f64; 3] {
    let axis = Vector3::from(rotation.axis);
    match Unit::try_new(axis, f64::EPSILON) {
        Some(axis) => {
            let (roll, pitch, yaw) = Rotation3::from_axis_angle(&axis, rotation.angle).euler_angles();
            [roll, pitch, yaw]
        }
        None => [0.0; 3],
    }
}
