// ==============================================================================
// suspension.rs — LINEAR SPRING + DAMPER ALONG THE WHEEL UP AXIS
// ------------------------------------------------------------------------------
//   F = (rest_length - ground_distance) * k - v_up * c
//
// Positive pushes the chassis up. No deadzone, no clamping: the force is
// allowed to pull down when the wheel is extended past its rest length.
// ==============================================================================

use crate::wheel::types::Real;

#[inline]
pub fn suspension_force(
    rest_length: Real,
    ground_distance: Real,
    vertical_velocity: Real,
    spring_strength: Real,
    damping: Real,
) -> Real {
    let offset = rest_length - ground_distance;
    offset * spring_strength - vertical_velocity * damping
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_at_rest_with_no_motion() {
        for rest in [0.1, 0.35, 0.5, 1.2] {
            assert_eq!(suspension_force(rest, rest, 0.0, 10_000.0, 300.0), 0.0);
        }
    }

    #[test]
    fn compression_pushes_up() {
        let f = suspension_force(0.5, 0.3, 0.0, 10_000.0, 300.0);
        assert_relative_eq!(f, 2000.0, epsilon = 1e-2);
    }

    #[test]
    fn damper_opposes_vertical_motion() {
        // moving down (compressing) adds support, moving up removes it
        let down = suspension_force(0.5, 0.5, -2.0, 10_000.0, 300.0);
        let up = suspension_force(0.5, 0.5, 2.0, 10_000.0, 300.0);
        assert_relative_eq!(down, 600.0);
        assert_relative_eq!(up, -600.0);
    }

    #[test]
    fn extension_past_rest_pulls_down() {
        assert!(suspension_force(0.3, 0.45, 0.0, 10_000.0, 300.0) < 0.0);
    }
}
