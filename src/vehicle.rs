use log::info;
use nalgebra::Point3;
use serde::Serialize;

use crate::config::VehicleConfig;
use crate::drivetrain::gearbox::ShiftEvent;
use crate::drivetrain::{DriveOutput, Drivetrain, DriverInput};
use crate::suspension_contact::PhysicsQuery;
use crate::wheel::types::{AppliedForce, Real, WheelId};
use crate::wheel::Wheel;

/// Four wheels + drivetrain. Owns no physics body; reads and drives it
/// through `PhysicsQuery` / `AppliedForce`.
pub struct Vehicle {
    pub wheels: [Wheel; 4],      // FL, FR, RL, RR
    pub drivetrain: Drivetrain,
    pub input: DriverInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct WheelTelemetry {
    pub id: WheelId,
    pub grounded: bool,
    pub ground_distance: Option<f32>,
    pub steer_deg: f32,
    pub forward_speed: f32, // m/s at the mount, along the wheel
    pub spin_deg: f32,
    pub drive_torque: f32,
    pub brake_torque: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleTelemetry {
    pub rpm: f32,
    pub gear: usize,
    pub speed_kmh: f32,
    pub drive_torque: f32,
    pub wheels: Vec<WheelTelemetry>,
}

impl Vehicle {
    /// Expects a validated config.
    pub fn new(cfg: &VehicleConfig) -> Self {
        let mounts = cfg.chassis.wheel_mounts;
        let wheels = WheelId::ALL.map(|id| {
            let [x, y, z] = mounts[id.index()];
            Wheel::new(id, cfg.wheel.clone(), Point3::new(x, y, z))
        });

        Self {
            wheels,
            drivetrain: Drivetrain::new(cfg),
            input: DriverInput::default(),
        }
    }

    pub fn wheel(&self, id: WheelId) -> &Wheel {
        &self.wheels[id.index()]
    }

    pub fn wheel_mut(&mut self, id: WheelId) -> &mut Wheel {
        &mut self.wheels[id.index()]
    }

    pub fn set_input(&mut self, input: DriverInput) {
        self.input = input;
    }

    fn rear_angular_speed(&self) -> Real {
        let rl = self.wheel(WheelId::RL).angular_speed();
        let rr = self.wheel(WheelId::RR).angular_speed();
        (rl + rr) / 2.0
    }

    /// Render-rate update: steering, rpm/gear, torques, ground probes.
    pub fn frame_update<Q: PhysicsQuery + ?Sized>(&mut self, query: &Q, dt: Real) -> DriveOutput {
        let out = self.drivetrain.update(&self.input, self.rear_angular_speed(), dt);

        self.wheel_mut(WheelId::FL).set_steer_angle(out.steer.left);
        self.wheel_mut(WheelId::FR).set_steer_angle(out.steer.right);

        for wheel in self.wheels.iter_mut() {
            wheel.set_brake_torque(out.brake_torque);
            wheel.probe(query);
        }

        match out.shift {
            Some(ShiftEvent::Up { to, .. }) => info!("⬆️ gear {} ({:.0} rpm)", to + 1, out.rpm),
            Some(ShiftEvent::Down { to, .. }) => info!("⬇️ gear {} ({:.0} rpm)", to + 1, out.rpm),
            None => {}
        }

        out
    }

    /// Physics-rate update. Returns every force the host must apply this step.
    pub fn physics_step<Q: PhysicsQuery + ?Sized>(&mut self, query: &Q, dt: Real) -> Vec<AppliedForce> {
        let mut forces = Vec::with_capacity(1 + self.wheels.len() * 4);

        let drag = self.drivetrain.drag_force(&query.linear_velocity());
        forces.push(AppliedForce::at_com(drag));

        for id in WheelId::ALL {
            let torque = self.drivetrain.wheel_drive_torque(id);
            self.wheel_mut(id).set_drive_torque(torque);
        }

        for wheel in self.wheels.iter_mut() {
            forces.extend(wheel.physics_step(query, dt));
        }

        forces
    }

    pub fn grounded_wheels(&self) -> usize {
        self.wheels.iter().filter(|w| w.grounded()).count()
    }

    pub fn telemetry<Q: PhysicsQuery + ?Sized>(&self, query: &Q) -> VehicleTelemetry {
        VehicleTelemetry {
            rpm: self.drivetrain.rpm(),
            gear: self.drivetrain.gear(),
            speed_kmh: query.linear_velocity().norm() * 3.6,
            drive_torque: self.drivetrain.drive_torque(),
            wheels: self
                .wheels
                .iter()
                .map(|w| WheelTelemetry {
                    id: w.id,
                    grounded: w.grounded(),
                    ground_distance: w.ground_distance(),
                    steer_deg: w.steer_angle().to_degrees(),
                    forward_speed: w.contact_velocity(),
                    spin_deg: w.spin_degrees(),
                    drive_torque: w.drive_torque(),
                    brake_torque: w.brake_torque(),
                })
                .collect(),
        }
    }
}
