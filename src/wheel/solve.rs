// ==============================================================================
// solve.rs — PER-WHEEL FORCE SOLVE
// ==============================================================================
// Combines, for one grounded wheel:
// - suspension (spring + damper) along the wheel up axis
// - lateral grip along the wheel right axis
// - drive along the wheel forward axis
// - brake against the rolling direction
//
// All four act at the wheel mount point. The caller decides grounding; this
// module assumes contact.
// ==============================================================================

use nalgebra::{Point3, Vector3};

use crate::config::WheelConfig;
use crate::suspension_contact::ContactSample;
use crate::wheel::grip::lateral_force;
use crate::wheel::kinematics::velocity_components;
use crate::wheel::longitudinal::{brake_force, drive_force};
use crate::wheel::suspension::suspension_force;
use crate::wheel::types::{AppliedForce, Real};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelForces {
    pub point: Point3<Real>,
    pub suspension: Vector3<Real>,
    pub lateral: Vector3<Real>,
    pub drive: Vector3<Real>,
    pub brake: Vector3<Real>,
}

impl WheelForces {
    pub fn total(&self) -> Vector3<Real> {
        self.suspension + self.lateral + self.drive + self.brake
    }

    pub fn applied(&self) -> [AppliedForce; 4] {
        [
            AppliedForce::at(self.suspension, self.point),
            AppliedForce::at(self.lateral, self.point),
            AppliedForce::at(self.drive, self.point),
            AppliedForce::at(self.brake, self.point),
        ]
    }
}

pub fn solve_wheel(
    cfg: &WheelConfig,
    contact: &ContactSample,
    ground_distance: Real,
    drive_torque: Real,
    brake_torque: Real,
    dt: Real,
) -> WheelForces {
    let basis = &contact.basis;
    let v = velocity_components(&contact.point_velocity, basis);

    let spring = suspension_force(
        cfg.rest_length,
        ground_distance,
        v.vertical,
        cfg.spring_strength,
        cfg.damping,
    );
    let lateral = lateral_force(v.lateral, cfg.grip_factor, cfg.mass, dt);

    WheelForces {
        point: contact.point,
        suspension: basis.up * spring,
        lateral: basis.right * lateral,
        drive: drive_force(&basis.forward, drive_torque),
        brake: brake_force(&basis.forward, &contact.point_velocity, brake_torque),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::kinematics::wheel_basis;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn contact(vel: Vector3<Real>, steer: Real) -> ContactSample {
        ContactSample {
            point: Point3::new(0.75, 0.3, 1.25),
            basis: wheel_basis(&UnitQuaternion::identity(), steer),
            point_velocity: vel,
        }
    }

    #[test]
    fn resting_wheel_produces_no_force() {
        let cfg = WheelConfig::default();
        let f = solve_wheel(&cfg, &contact(Vector3::zeros(), 0.0), cfg.rest_length, 0.0, 0.0, 0.02);
        assert_eq!(f.total(), Vector3::zeros());
    }

    #[test]
    fn forces_land_on_their_axes() {
        let cfg = WheelConfig::default();
        let vel = Vector3::new(-1.0, 0.0, 8.0); // rolling forward, sliding right (-X)
        let f = solve_wheel(&cfg, &contact(vel, 0.0), 0.3, 600.0, 200.0, 0.02);

        // 0.2 m compression * 10000 N/m
        assert_relative_eq!(f.suspension, Vector3::new(0.0, 2000.0, 0.0), epsilon = 1e-2);
        // grip pushes back to the left (+X)
        assert!(f.lateral.x > 0.0);
        assert_relative_eq!(f.lateral.x, 1.0 * 0.4 / 0.02 * 10.0, epsilon = 1e-2);
        assert_relative_eq!(f.drive, Vector3::new(0.0, 0.0, 600.0), epsilon = 1e-4);
        assert_relative_eq!(f.brake, Vector3::new(0.0, 0.0, -200.0), epsilon = 1e-4);
        assert_eq!(f.applied().len(), 4);
        assert!(f.applied().iter().all(|a| a.at_point == Some(f.point)));
    }

    #[test]
    fn steered_wheel_drives_along_its_heading() {
        let cfg = WheelConfig::default();
        let f = solve_wheel(&cfg, &contact(Vector3::zeros(), 0.4), cfg.rest_length, 1000.0, 0.0, 0.02);
        assert_relative_eq!(f.drive.norm(), 1000.0, epsilon = 1e-2);
        assert!(f.drive.x < 0.0, "right steer should pull toward -X");
    }
}
