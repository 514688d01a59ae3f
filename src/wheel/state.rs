use log::trace;
use nalgebra::Point3;

use crate::config::WheelConfig;
use crate::suspension_contact::{PhysicsQuery, probe_ground, sample_contact};
use crate::wheel::kinematics::{advance_spin, rolling_speed, velocity_components};
use crate::wheel::solve::{WheelForces, solve_wheel};
use crate::wheel::types::{AppliedForce, Real, WheelId};

/// One wheel as owned by the vehicle: fixed parameters plus per-step state.
#[derive(Debug, Clone)]
pub struct Wheel {
    pub id: WheelId,
    pub config: WheelConfig,
    pub mount: Point3<Real>,     // chassis local

    drive_torque: Real,
    brake_torque: Real,
    steer_angle: Real,           // radians, + = right

    ground_distance: Option<Real>,
    contact_velocity: Real,      // forward speed at the mount, m/s
    angular_speed: Real,         // rad/s
    spin_deg: Real,
    last_forces: Option<WheelForces>,
}

impl Wheel {
    pub fn new(id: WheelId, config: WheelConfig, mount: Point3<Real>) -> Self {
        Self {
            id,
            config,
            mount,
            drive_torque: 0.0,
            brake_torque: 0.0,
            steer_angle: 0.0,
            ground_distance: None,
            contact_velocity: 0.0,
            angular_speed: 0.0,
            spin_deg: 0.0,
            last_forces: None,
        }
    }

    pub fn set_drive_torque(&mut self, torque: Real) {
        self.drive_torque = torque;
    }

    pub fn set_brake_torque(&mut self, torque: Real) {
        self.brake_torque = torque;
    }

    pub fn set_steer_angle(&mut self, angle: Real) {
        self.steer_angle = angle;
    }

    pub fn drive_torque(&self) -> Real { self.drive_torque }
    pub fn brake_torque(&self) -> Real { self.brake_torque }
    pub fn steer_angle(&self) -> Real { self.steer_angle }
    pub fn ground_distance(&self) -> Option<Real> { self.ground_distance }
    pub fn grounded(&self) -> bool { self.ground_distance.is_some() }
    pub fn contact_velocity(&self) -> Real { self.contact_velocity }
    pub fn angular_speed(&self) -> Real { self.angular_speed }
    pub fn spin_degrees(&self) -> Real { self.spin_deg }
    pub fn last_forces(&self) -> Option<&WheelForces> { self.last_forces.as_ref() }

    /// Frame-rate ground check. A miss clears the distance.
    pub fn probe<Q: PhysicsQuery + ?Sized>(&mut self, query: &Q) {
        self.ground_distance = probe_ground(query, &self.mount, self.config.probe_length);
    }

    /// Physics-rate update: spin the wheel and, when grounded, emit its forces.
    pub fn physics_step<Q: PhysicsQuery + ?Sized>(&mut self, query: &Q, dt: Real) -> Vec<AppliedForce> {
        let contact = sample_contact(query, &self.mount, self.steer_angle);
        let forward = velocity_components(&contact.point_velocity, &contact.basis).forward;

        self.contact_velocity = forward;
        self.angular_speed = rolling_speed(forward, self.config.radius);
        self.spin_deg = advance_spin(self.spin_deg, forward, self.config.radius, dt);

        let Some(distance) = self.ground_distance else {
            self.last_forces = None;
            return Vec::new();
        };

        let forces = solve_wheel(
            &self.config,
            &contact,
            distance,
            self.drive_torque,
            self.brake_torque,
            dt,
        );
        trace!(
            "wheel {} d={:.3} Fs={:.1} Flat={:.1}",
            self.id,
            distance,
            forces.suspension.norm(),
            forces.lateral.norm()
        );

        self.last_forces = Some(forces);
        forces.applied().to_vec()
    }
}
