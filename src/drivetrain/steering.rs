// ==============================================================================
// steering.rs — ACKERMANN STEERING GEOMETRY (FRONT AXLE)
// ==============================================================================
// Given:
// - wheelbase L, track width T
// - max steer angle, driver steer input (-1..1)
// - ackermann blend (0 = parallel, 1 = full ackermann)
//
// With δ = |input| * max_steer_angle:
//   inside  = atan2(2L·sinδ, 2L·cosδ − T·sinδ)
//   outside = atan2(2L·sinδ, 2L·cosδ + T·sinδ)
//
// i.e. cot(outside) − cot(inside) = T / L: both front wheels roll around the
// same centre on the rear axle line.
//
// Sign convention: negative input steers left (FL is the inside wheel),
// positive input steers right (FR is the inside wheel). Output angles are
// signed the same way (radians, + = right).
// ==============================================================================

use crate::config::SteeringConfig;
use crate::wheel::types::Real;

/// Steering geometry (per vehicle)
#[derive(Debug, Clone, Copy)]
pub struct SteeringGeometry {
    pub wheelbase: Real,       // meters
    pub track_width: Real,     // meters
    pub max_steer_angle: Real, // radians
    pub ackermann: Real,       // 0 = parallel, 1 = full Ackermann
}

impl From<&SteeringConfig> for SteeringGeometry {
    fn from(cfg: &SteeringConfig) -> Self {
        Self {
            wheelbase: cfg.wheelbase,
            track_width: cfg.track_width,
            max_steer_angle: cfg.max_steer_angle_deg.to_radians(),
            ackermann: cfg.ackermann,
        }
    }
}

/// Front wheel angles, radians, + = right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteerAngles {
    pub left: Real,
    pub right: Real,
}

/// Unsigned (inside, outside) angles for a centreline steer angle `delta` >= 0.
pub fn ackermann_angles(delta: Real, wheelbase: Real, track: Real) -> (Real, Real) {
    let (s, c) = delta.sin_cos();
    let inside = (2.0 * wheelbase * s).atan2(2.0 * wheelbase * c - track * s);
    let outside = (2.0 * wheelbase * s).atan2(2.0 * wheelbase * c + track * s);
    (inside, outside)
}

pub fn solve_steering(geom: &SteeringGeometry, steer_input: Real) -> SteerAngles {
    let input = steer_input.clamp(-1.0, 1.0);
    if input == 0.0 {
        return SteerAngles::default();
    }

    let delta = input.abs() * geom.max_steer_angle;
    let (ack_in, ack_out) = ackermann_angles(delta, geom.wheelbase, geom.track_width);

    // blend toward parallel steer
    let inside = (1.0 - geom.ackermann) * delta + geom.ackermann * ack_in;
    let outside = (1.0 - geom.ackermann) * delta + geom.ackermann * ack_out;

    if input < 0.0 {
        SteerAngles { left: -inside, right: -outside }
    } else {
        SteerAngles { left: outside, right: inside }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geom() -> SteeringGeometry {
        SteeringGeometry::from(&SteeringConfig {
            wheelbase: 2.5,
            track_width: 1.5,
            max_steer_angle_deg: 30.0,
            ackermann: 1.0,
        })
    }

    #[test]
    fn centred_input_is_straight() {
        assert_eq!(solve_steering(&geom(), 0.0), SteerAngles { left: 0.0, right: 0.0 });
    }

    #[test]
    fn full_right_lock_matches_formula() {
        let a = solve_steering(&geom(), 1.0);
        let d = 30.0_f32.to_radians();
        let inside = (5.0 * d.sin()).atan2(5.0 * d.cos() - 1.5 * d.sin());
        let outside = (5.0 * d.sin()).atan2(5.0 * d.cos() + 1.5 * d.sin());

        assert_relative_eq!(a.right, inside, epsilon = 1e-6);
        assert_relative_eq!(a.left, outside, epsilon = 1e-6);
        assert_relative_eq!(a.right.to_degrees(), 34.93, epsilon = 0.01);
        assert_relative_eq!(a.left.to_degrees(), 26.20, epsilon = 0.01);
    }

    #[test]
    fn wheels_share_a_turn_centre() {
        let a = solve_steering(&geom(), 0.6);
        let cot = |x: Real| 1.0 / x.tan();
        assert_relative_eq!(cot(a.left) - cot(a.right), 1.5 / 2.5, epsilon = 1e-4);
    }

    #[test]
    fn left_turn_mirrors_right_turn() {
        let r = solve_steering(&geom(), 0.7);
        let l = solve_steering(&geom(), -0.7);
        assert_relative_eq!(l.left, -r.right, epsilon = 1e-6);
        assert_relative_eq!(l.right, -r.left, epsilon = 1e-6);
        assert!(l.left < 0.0 && l.right < 0.0);
    }

    #[test]
    fn inside_wheel_turns_at_least_as_far() {
        for i in 1..=20 {
            let input = i as Real / 20.0;
            for sign in [-1.0, 1.0] {
                let a = solve_steering(&geom(), sign * input);
                let (inside, outside) = if sign < 0.0 { (a.left, a.right) } else { (a.right, a.left) };
                assert!(inside.abs() >= outside.abs(), "input {}", sign * input);
            }
        }
    }

    #[test]
    fn zero_blend_is_parallel() {
        let mut g = geom();
        g.ackermann = 0.0;
        let a = solve_steering(&g, 0.5);
        assert_relative_eq!(a.left, a.right);
        assert_relative_eq!(a.left, 15.0_f32.to_radians(), epsilon = 1e-6);
    }
}
