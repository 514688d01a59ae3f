// ==============================================================================
// longitudinal.rs — DRIVE + BRAKE ALONG THE WHEEL FORWARD AXIS
// ==============================================================================
// - Drive: the wheel's drive torque pushes straight along its forward axis.
// - Brake: the wheel's brake torque opposes the forward projection of the
//   contact point velocity. Braking opposes motion, never wheel heading, so a
//   wheel rolling backwards is braked forwards.
// - A contact that is not rolling (|v_forward| below BRAKE_EPS) has no brake
//   direction and gets no brake force.
// ==============================================================================

use nalgebra::Vector3;

use crate::wheel::types::Real;

const BRAKE_EPS: Real = 1e-4;

#[inline]
pub fn drive_force(forward: &Vector3<Real>, drive_torque: Real) -> Vector3<Real> {
    forward * drive_torque
}

pub fn brake_force(forward: &Vector3<Real>, point_vel: &Vector3<Real>, brake_torque: Real) -> Vector3<Real> {
    let dir = forward.normalize();
    let rolling = dir * point_vel.dot(&dir);

    match rolling.try_normalize(BRAKE_EPS) {
        Some(rolling_dir) => -rolling_dir * brake_torque,
        None => Vector3::zeros(),
    }
}
