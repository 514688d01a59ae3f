// ==============================================================================
// resistance.rs — AERODYNAMIC DRAG
// ==============================================================================
// Drag is tuned so that at the theoretical top speed it matches the current
// drive force:
//
//   v_max = max_rpm / top_ratio / differential_ratio * radius * 2π/60
//   |F|   = drive_torque / v_max² * speed²        (opposes velocity)
// ==============================================================================

use nalgebra::Vector3;
use std::f32::consts::PI;

use crate::wheel::types::Real;

const MIN_SPEED: Real = 1e-4;

/// Top speed (m/s) at max rpm in top gear, without slip.
#[inline]
pub fn top_speed(max_rpm: Real, top_ratio: Real, differential_ratio: Real, wheel_radius: Real) -> Real {
    max_rpm * (1.0 / top_ratio) * (1.0 / differential_ratio) * wheel_radius * (2.0 * PI / 60.0)
}

pub fn drag_force(drive_torque: Real, v_max: Real, velocity: &Vector3<Real>) -> Vector3<Real> {
    let speed = velocity.norm();
    if speed < MIN_SPEED {
        return Vector3::zeros();
    }
    let magnitude = drive_torque / (v_max * v_max) * speed * speed;
    -velocity / speed * magnitude
}
