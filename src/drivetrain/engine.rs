// ==============================================================================
// engine.rs — TORQUE CURVE + RPM
// ==============================================================================
// TorqueCurve is a keyed piecewise-linear curve (rpm -> Nm), clamped to its
// first/last key outside the keyed range.
//
// engine_rpm(...):
//     rpm = clamp(wheel_rpm * gear_ratio * differential_ratio, idle, max)
// ==============================================================================

use std::f32::consts::PI;

use crate::wheel::types::Real;

#[derive(Debug, Clone, PartialEq)]
pub struct TorqueCurve {
    keys: Vec<(Real, Real)>, // sorted by rpm
}

impl TorqueCurve {
    pub fn new(keys: &[[Real; 2]]) -> Self {
        let mut keys: Vec<(Real, Real)> = keys.iter().map(|[rpm, nm]| (*rpm, *nm)).collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    pub fn evaluate(&self, rpm: Real) -> Real {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if rpm <= first.0 {
            return first.1;
        }
        if rpm >= last.0 {
            return last.1;
        }

        // first key strictly above rpm; guaranteed to exist and be > 0 here
        let hi = self.keys.partition_point(|(k, _)| *k <= rpm);
        let (r0, t0) = self.keys[hi - 1];
        let (r1, t1) = self.keys[hi];
        let span = r1 - r0;
        if span <= 0.0 {
            return t1;
        }
        t0 + (t1 - t0) * (rpm - r0) / span
    }
}

/// rad/s -> rev/min
#[inline]
pub fn to_rpm(angular_speed: Real) -> Real {
    angular_speed * 60.0 / (2.0 * PI)
}

#[inline]
pub fn engine_rpm(wheel_rpm: Real, gear_ratio: Real, differential_ratio: Real, idle_rpm: Real, max_rpm: Real) -> Real {
    let rpm = wheel_rpm * gear_ratio * differential_ratio;
    if rpm.is_nan() {
        return idle_rpm;
    }
    rpm.clamp(idle_rpm, max_rpm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> TorqueCurve {
        TorqueCurve::new(&[[4000.0, 400.0], [1000.0, 200.0], [6000.0, 300.0]])
    }

    #[test]
    fn interpolates_between_unsorted_keys() {
        let c = curve();
        assert_relative_eq!(c.evaluate(1000.0), 200.0);
        assert_relative_eq!(c.evaluate(2500.0), 300.0);
        assert_relative_eq!(c.evaluate(4000.0), 400.0);
        assert_relative_eq!(c.evaluate(5000.0), 350.0);
    }

    #[test]
    fn clamps_outside_keyed_range() {
        let c = curve();
        assert_relative_eq!(c.evaluate(0.0), 200.0);
        assert_relative_eq!(c.evaluate(9000.0), 300.0);
    }

    #[test]
    fn single_key_is_flat() {
        let c = TorqueCurve::new(&[[3000.0, 250.0]]);
        assert_eq!(c.evaluate(100.0), 250.0);
        assert_eq!(c.evaluate(8000.0), 250.0);
    }

    #[test]
    fn rpm_stays_in_band() {
        for wheel_rpm in [-500.0, 0.0, 10.0, 300.0, 900.0, 1e6] {
            let rpm = engine_rpm(wheel_rpm, 2.66, 3.42, 1000.0, 6000.0);
            assert!((1000.0..=6000.0).contains(&rpm), "rpm {rpm} for wheel {wheel_rpm}");
        }
        assert_eq!(engine_rpm(Real::NAN, 1.0, 1.0, 1000.0, 6000.0), 1000.0);
    }

    #[test]
    fn one_revolution_per_second_is_sixty_rpm() {
        assert_relative_eq!(to_rpm(2.0 * PI), 60.0, epsilon = 1e-4);
    }
}
