// ==============================================================================
// suspension_contact.rs — HOST QUERIES + GROUND PROBE + CONTACT SAMPLING
// ------------------------------------------------------------------------------
// The wheel model never talks to the physics engine directly. Everything it
// needs from the host goes through `PhysicsQuery`:
// - chassis pose (for mount points and the wheel frame)
// - velocity of a point rigidly attached to the chassis
// - a ray cast that ignores the chassis itself
//
// probe_ground(...)
//     Casts a fixed-length ray from the wheel mount along the chassis down
//     axis. Returns the hit distance, or None on a miss.
//
// sample_contact(...)
//     Builds the world-space wheel frame and the mount point velocity used by
//     wheel::solve.
//
// Notes:
// - This file does NOT apply forces. It only measures.
// ==============================================================================

use nalgebra::{Isometry3, Point3, Vector3};

use crate::wheel::kinematics::wheel_basis;
use crate::wheel::types::{Real, WheelBasis};

/// Read-only view of the host chassis body.
pub trait PhysicsQuery {
    fn chassis_pose(&self) -> Isometry3<Real>;

    fn linear_velocity(&self) -> Vector3<Real>;

    /// World velocity of a world-space point rigidly attached to the chassis.
    fn point_velocity(&self, point: &Point3<Real>) -> Vector3<Real>;

    /// Time of impact along `dir` (unit length), ignoring the chassis.
    fn cast_ray(&self, origin: &Point3<Real>, dir: &Vector3<Real>, max_toi: Real) -> Option<Real>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    pub point: Point3<Real>,
    pub basis: WheelBasis,
    pub point_velocity: Vector3<Real>,
}

#[inline]
pub fn mount_world(pose: &Isometry3<Real>, mount_local: &Point3<Real>) -> Point3<Real> {
    pose * mount_local
}

pub fn probe_ground<Q: PhysicsQuery + ?Sized>(
    query: &Q,
    mount_local: &Point3<Real>,
    probe_length: Real,
) -> Option<Real> {
    let pose = query.chassis_pose();
    let origin = mount_world(&pose, mount_local);
    let down = pose.rotation * -Vector3::y();

    query.cast_ray(&origin, &down, probe_length)
}

pub fn sample_contact<Q: PhysicsQuery + ?Sized>(
    query: &Q,
    mount_local: &Point3<Real>,
    steer_angle: Real,
) -> ContactSample {
    let pose = query.chassis_pose();
    let point = mount_world(&pose, mount_local);

    ContactSample {
        point,
        basis: wheel_basis(&pose.rotation, steer_angle),
        point_velocity: query.point_velocity(&point),
    }
}

/// Analytic host used by unit tests: one rigid chassis over the plane y = ground_y.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct FlatGround {
        pub ground_y: Real,
        pub pose: Isometry3<Real>,
        pub linvel: Vector3<Real>,
        pub angvel: Vector3<Real>,
    }

    impl FlatGround {
        pub fn at_height(y: Real) -> Self {
            Self {
                ground_y: 0.0,
                pose: Isometry3::translation(0.0, y, 0.0),
                linvel: Vector3::zeros(),
                angvel: Vector3::zeros(),
            }
        }

        pub fn moving(mut self, linvel: Vector3<Real>) -> Self {
            self.linvel = linvel;
            self
        }
    }

    impl PhysicsQuery for FlatGround {
        fn chassis_pose(&self) -> Isometry3<Real> {
            self.pose
        }

        fn linear_velocity(&self) -> Vector3<Real> {
            self.linvel
        }

        fn point_velocity(&self, point: &Point3<Real>) -> Vector3<Real> {
            let com = Point3::from(self.pose.translation.vector);
            self.linvel + self.angvel.cross(&(point - com))
        }

        fn cast_ray(&self, origin: &Point3<Real>, dir: &Vector3<Real>, max_toi: Real) -> Option<Real> {
            if dir.y >= -1e-6 {
                return None;
            }
            let toi = (origin.y - self.ground_y) / -dir.y;
            (toi >= 0.0 && toi <= max_toi).then_some(toi)
        }
    }
}
