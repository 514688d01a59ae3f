// ==============================================================================
// grip.rs — LATERAL GRIP (SLIP CANCELLATION)
// ------------------------------------------------------------------------------
// Cancels a fraction (grip_factor) of the sideways velocity at the contact
// point within one step, treating the wheel mass as the body being stopped:
//
//   dv = -v_lat * grip_factor
//   F  = (dv / dt) * wheel_mass
// ==============================================================================

use crate::wheel::types::Real;

#[inline]
pub fn lateral_force(lateral_velocity: Real, grip_factor: Real, wheel_mass: Real, dt: Real) -> Real {
    let desired_velocity_change = -lateral_velocity * grip_factor;
    let desired_accel = desired_velocity_change / dt;
    desired_accel * wheel_mass
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn opposes_sideways_slip() {
        let f = lateral_force(2.0, 0.4, 10.0, 1.0 / 50.0);
        // -(2 * 0.4) / 0.02 * 10
        assert_relative_eq!(f, -400.0, epsilon = 1e-3);
        assert!(lateral_force(-2.0, 0.4, 10.0, 0.02) > 0.0);
    }

    #[test]
    fn no_slip_no_force() {
        assert_eq!(lateral_force(0.0, 1.0, 10.0, 0.02), 0.0);
    }

    #[test]
    fn zero_grip_lets_the_wheel_slide() {
        assert_eq!(lateral_force(3.0, 0.0, 10.0, 0.02), 0.0);
    }
}
