//! Face-to-direction reorientation
//!
//! Given the world-space normal of a picked face, these functions compute the
//! rotation that turns that face toward a target direction. They are pure:
//! the caller decides how to approach the result (see [`crate::state`]).

use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

use crate::config::PARALLEL_EPSILON;

/// Axis used when the face normal and target are parallel or antiparallel
///
/// X unless the target itself lies along X, in which case Z. The fallback
/// must be perpendicular to the target for a 180° turn to map the normal
/// onto it.
fn fallback_axis(target: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let axis = if target.cross(&Vector3::x()).norm() < PARALLEL_EPSILON {
        Vector3::z()
    } else {
        // Project out the target component so the axis is exactly perpendicular.
        Vector3::x() - target * target.dot(&Vector3::x())
    };
    Unit::new_normalize(axis)
}

/// Rotation that turns `face_normal` onto `target`
///
/// The axis is `normalize(face_normal × target)` and the angle
/// `acos(face_normal · target)`. When the two are parallel (cross product
/// shorter than `epsilon`) the result is the identity; when antiparallel it
/// is a half turn about a fallback axis. Zero-length or non-finite inputs
/// give the identity. The result never contains NaN.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use printprep::orientation::solve_rotation;
///
/// let q = solve_rotation(&Vector3::x(), &-Vector3::y(), 1e-6);
/// let turned = q * Vector3::x();
/// assert!((turned - (-Vector3::y())).norm() < 1e-9);
/// ```
pub fn solve_rotation(
    face_normal: &Vector3<f64>,
    target: &Vector3<f64>,
    epsilon: f64,
) -> UnitQuaternion<f64> {
    let finite_unit = |v: &Vector3<f64>| {
        v.try_normalize(0.0)
            .filter(|u| u.iter().all(|c| c.is_finite()))
    };
    let (Some(n), Some(t)) = (finite_unit(face_normal), finite_unit(target)) else {
        return UnitQuaternion::identity();
    };

    let cos_angle = n.dot(&t).clamp(-1.0, 1.0);
    let cross = n.cross(&t);

    if cross.norm() < epsilon {
        return if cos_angle > 0.0 {
            UnitQuaternion::identity()
        } else {
            UnitQuaternion::from_axis_angle(&fallback_axis(&t), PI)
        };
    }

    UnitQuaternion::from_axis_angle(&Unit::new_normalize(cross), cos_angle.acos())
}

/// Rotation that lays the face flat on a bed whose surface normal is `bed_up`
///
/// The face normal is first aligned with `bed_up`, then flipped a half turn
/// about an axis perpendicular to `bed_up`, so the face ends up pointing
/// straight into the bed.
pub fn solve_placement(face_normal: &Vector3<f64>, bed_up: &Vector3<f64>) -> UnitQuaternion<f64> {
    let Some(up) = bed_up.try_normalize(0.0) else {
        return UnitQuaternion::identity();
    };
    let align = solve_rotation(face_normal, &up, PARALLEL_EPSILON);
    let flip = UnitQuaternion::from_axis_angle(&fallback_axis(&up), PI);
    flip * align
}

/// Absolute orientation reached by applying `delta` after `current`
pub fn target_orientation(
    current: &UnitQuaternion<f64>,
    delta: &UnitQuaternion<f64>,
) -> UnitQuaternion<f64> {
    delta * current
}

/// Advance `current` toward `target` by at most `max_step` radians
///
/// Returns `target` itself once within `max_step`.
pub fn rotate_towards(
    current: &UnitQuaternion<f64>,
    target: &UnitQuaternion<f64>,
    max_step: f64,
) -> UnitQuaternion<f64> {
    let angle = current.angle_to(target);
    if angle <= max_step {
        return *target;
    }
    current
        .try_slerp(target, max_step / angle, 1.0e-9)
        .unwrap_or(*target)
}
