// ==============================================================================
// kinematics.rs — WHEEL BASIS + VELOCITY DECOMPOSITION (WORLD SPACE)
// ------------------------------------------------------------------------------
// Chassis convention: +Y up, +Z forward, -X right (right-handed).
//
// wheel_basis(...):
// - Rotates the chassis frame around its up axis by the wheel steer angle
//   (positive angle = steer to the right)
//
// velocity_components(point_vel, basis):
// - Projects the contact point velocity onto up/forward/right
//
// advance_spin(...):
// - Visual wheel rotation from distance rolled this step
// ==============================================================================

use nalgebra::{UnitQuaternion, Vector3};
use std::f32::consts::PI;

use crate::wheel::types::{Real, WheelBasis};

#[inline]
pub fn wheel_basis(chassis_rot: &UnitQuaternion<Real>, steer_angle: Real) -> WheelBasis {
    let steer_rot = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -steer_angle);
    let rot = chassis_rot * steer_rot;

    WheelBasis {
        up: rot * Vector3::y(),
        forward: rot * Vector3::z(),
        right: rot * -Vector3::x(),
    }
}

/// Point velocity split along the wheel frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityComponents {
    pub vertical: Real,
    pub forward: Real,
    pub lateral: Real,
}

#[inline]
pub fn velocity_components(point_vel: &Vector3<Real>, basis: &WheelBasis) -> VelocityComponents {
    VelocityComponents {
        vertical: point_vel.dot(&basis.up),
        forward: point_vel.dot(&basis.forward),
        lateral: point_vel.dot(&basis.right),
    }
}

/// Rolling angular speed (rad/s) for a wheel moving at `forward_speed` without slip.
#[inline]
pub fn rolling_speed(forward_speed: Real, radius: Real) -> Real {
    forward_speed / radius
}

/// Advance the mesh spin angle (degrees, wrapped to [0, 360)).
#[inline]
pub fn advance_spin(spin_deg: Real, forward_speed: Real, radius: Real, dt: Real) -> Real {
    let distance = forward_speed * dt;
    let turns = distance / (2.0 * PI * radius);
    (spin_deg + turns * 360.0).rem_euclid(360.0)
}
