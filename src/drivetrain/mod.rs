//! drivetrain - driver input -> steering, rpm, gear, drive/brake torque, drag.

pub mod engine;
pub mod gearbox;
pub mod resistance;
pub mod steering;

use log::debug;
use nalgebra::Vector3;

use crate::config::{DriveLayout, VehicleConfig};
use crate::wheel::types::{Real, WheelId};
use engine::{TorqueCurve, engine_rpm, to_rpm};
use gearbox::{Gearbox, ShiftEvent};
use steering::{SteerAngles, SteeringGeometry, solve_steering};

/// Driver intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverInput {
    pub throttle: Real, // 0..1
    pub brake: Real,    // 0..1
    pub steer: Real,    // -1 (left) .. 1 (right)
}

impl DriverInput {
    /// Single stick: horizontal = steer, vertical > 0 = throttle, < 0 = brake.
    pub fn from_axes(horizontal: Real, vertical: Real) -> Self {
        let vertical = vertical.clamp(-1.0, 1.0);
        Self {
            throttle: vertical.max(0.0),
            brake: (-vertical).max(0.0),
            steer: horizontal.clamp(-1.0, 1.0),
        }
    }
}

/// Result of one frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveOutput {
    pub steer: SteerAngles,
    pub rpm: Real,
    pub gear: usize,
    pub shift: Option<ShiftEvent>,
    pub drive_torque: Real,
    pub brake_torque: Real,
}

#[derive(Debug, Clone)]
pub struct Drivetrain {
    torque_curve: TorqueCurve,
    idle_rpm: Real,
    max_rpm: Real,
    gearbox: Gearbox,
    differential_ratio: Real,
    efficiency: Real,
    layout: DriveLayout,
    brake_force: Real,
    geometry: SteeringGeometry,
    v_max: Real,

    rpm: Real,
    drive_torque: Real,
    brake_torque: Real,
}

impl Drivetrain {
    /// Expects a validated config (non-empty, positive ratios; positive radius).
    pub fn new(cfg: &VehicleConfig) -> Self {
        let t = &cfg.transmission;
        let gearbox = Gearbox::new(t.gear_ratios.clone(), t.initial_gear, t.shift_cooldown);
        let v_max = resistance::top_speed(
            cfg.engine.max_rpm,
            gearbox.top_ratio(),
            t.differential_ratio,
            cfg.wheel.radius,
        );
        debug!("drivetrain v_max = {:.2} m/s ({:.1} km/h)", v_max, v_max * 3.6);

        Self {
            torque_curve: TorqueCurve::new(&cfg.engine.torque_curve),
            idle_rpm: cfg.engine.idle_rpm,
            max_rpm: cfg.engine.max_rpm,
            gearbox,
            differential_ratio: t.differential_ratio,
            efficiency: t.efficiency,
            layout: t.layout,
            brake_force: cfg.brake_force,
            geometry: SteeringGeometry::from(&cfg.steering),
            v_max,
            rpm: cfg.engine.idle_rpm,
            drive_torque: 0.0,
            brake_torque: 0.0,
        }
    }

    pub fn rpm(&self) -> Real { self.rpm }
    pub fn gear(&self) -> usize { self.gearbox.gear() }
    pub fn v_max(&self) -> Real { self.v_max }
    pub fn drive_torque(&self) -> Real { self.drive_torque }
    pub fn brake_torque(&self) -> Real { self.brake_torque }

    /// `rear_angular_speed`: mean rolling speed of the rear wheels, rad/s.
    pub fn update(&mut self, input: &DriverInput, rear_angular_speed: Real, dt: Real) -> DriveOutput {
        let throttle = input.throttle.clamp(0.0, 1.0);
        let brake = input.brake.clamp(0.0, 1.0);

        let steer = solve_steering(&self.geometry, input.steer);

        // RPM uses the gear engaged at the start of the frame, shifting happens after
        let wheel_rpm = to_rpm(rear_angular_speed);
        self.rpm = engine_rpm(
            wheel_rpm,
            self.gearbox.ratio(),
            self.differential_ratio,
            self.idle_rpm,
            self.max_rpm,
        );

        let shift = self.gearbox.update(self.rpm, self.idle_rpm, self.max_rpm, dt);
        if let Some(event) = shift {
            debug!("shift {:?} at {:.0} rpm", event, self.rpm);
        }

        let engine_torque = throttle * self.torque_curve.evaluate(self.rpm);
        self.drive_torque =
            engine_torque * self.gearbox.ratio() * self.differential_ratio * self.efficiency;

        self.brake_torque = if brake > 0.0 { brake * self.brake_force } else { 0.0 };

        DriveOutput {
            steer,
            rpm: self.rpm,
            gear: self.gearbox.gear(),
            shift,
            drive_torque: self.drive_torque,
            brake_torque: self.brake_torque,
        }
    }

    /// Share of the current drive torque for one wheel.
    pub fn wheel_drive_torque(&self, id: WheelId) -> Real {
        match self.layout {
            DriveLayout::RearWheel if id.is_rear() => self.drive_torque / 2.0,
            DriveLayout::RearWheel => 0.0,
            DriveLayout::AllWheel => self.drive_torque / 4.0,
        }
    }

    pub fn drag_force(&self, velocity: &Vector3<Real>) -> Vector3<Real> {
        resistance::drag_force(self.drive_torque, self.v_max, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn drivetrain() -> Drivetrain {
        let mut cfg = VehicleConfig::default();
        cfg.transmission.shift_cooldown = 0.0;
        cfg.engine.torque_curve = vec![[0.0, 400.0]];
        Drivetrain::new(&cfg)
    }

    /// rear wheel rad/s that turns the engine at `rpm` in the current gear
    fn rolling_for(dt: &Drivetrain, rpm: Real) -> Real {
        rpm / (dt.gearbox.ratio() * dt.differential_ratio) * 2.0 * PI / 60.0
    }

    #[test]
    fn stick_maps_to_throttle_or_brake() {
        assert_eq!(DriverInput::from_axes(0.3, 0.8), DriverInput { throttle: 0.8, brake: 0.0, steer: 0.3 });
        assert_eq!(DriverInput::from_axes(-2.0, -0.5), DriverInput { throttle: 0.0, brake: 0.5, steer: -1.0 });
        assert_eq!(DriverInput::from_axes(0.0, 0.0), DriverInput::default());
    }

    #[test]
    fn standstill_idles_and_drops_a_gear() {
        let mut d = drivetrain();
        assert_eq!(d.gear(), 1);
        let out = d.update(&DriverInput::default(), 0.0, 1.0 / 30.0);
        assert_eq!(out.rpm, 1000.0);
        assert_eq!(out.gear, 0);
        assert_eq!(out.shift, Some(ShiftEvent::Down { from: 1, to: 0 }));
    }

    #[test]
    fn engine_rpm_follows_rear_wheels() {
        let mut d = drivetrain();
        let w = rolling_for(&d, 3000.0);
        let out = d.update(&DriverInput::default(), w, 1.0 / 30.0);
        assert_relative_eq!(out.rpm, 3000.0, epsilon = 0.5);
        assert_eq!(out.shift, None);
    }

    #[test]
    fn redline_upshifts() {
        let mut d = drivetrain();
        let w = rolling_for(&d, 6500.0);
        let out = d.update(&DriverInput::default(), w, 1.0 / 30.0);
        assert_eq!(out.rpm, 6000.0);
        assert_eq!(out.gear, 2);
    }

    #[test]
    fn rpm_and_gear_stay_bounded() {
        let mut d = drivetrain();
        let speeds = [0.0, 5.0, 500.0, -40.0, 80.0, 1e5, 3.0, 0.0];
        for _ in 0..10 {
            for w in speeds {
                let out = d.update(&DriverInput::from_axes(0.0, 1.0), w, 0.01);
                assert!((1000.0..=6000.0).contains(&out.rpm));
                assert!(out.gear < 6);
            }
        }
    }

    #[test]
    fn drive_torque_goes_through_gearing() {
        let mut d = drivetrain();
        let w = rolling_for(&d, 3000.0);
        let out = d.update(&DriverInput::from_axes(0.0, 0.5), w, 1.0 / 30.0);
        // 0.5 * 400 Nm * 1.78 * 3.42 * 0.7
        assert_relative_eq!(out.drive_torque, 0.5 * 400.0 * 1.78 * 3.42 * 0.7, epsilon = 1e-2);
        assert_eq!(out.brake_torque, 0.0);
    }

    #[test]
    fn brake_is_uniform_and_released_to_zero() {
        let mut d = drivetrain();
        let out = d.update(&DriverInput::from_axes(0.0, -0.5), 0.0, 0.02);
        assert_relative_eq!(out.brake_torque, 0.5 * 3000.0);
        assert_eq!(out.drive_torque, 0.0);

        let out = d.update(&DriverInput::default(), 0.0, 0.02);
        assert_eq!(out.brake_torque, 0.0);
    }

    #[test]
    fn torque_split_follows_layout() {
        let mut d = drivetrain();
        d.drive_torque = 1000.0;
        assert_eq!(d.wheel_drive_torque(WheelId::FL), 0.0);
        assert_eq!(d.wheel_drive_torque(WheelId::RR), 500.0);

        d.layout = DriveLayout::AllWheel;
        let total: Real = WheelId::ALL.iter().map(|id| d.wheel_drive_torque(*id)).sum();
        assert_eq!(d.wheel_drive_torque(WheelId::FR), 250.0);
        assert_eq!(total, 1000.0);
    }

    #[test]
    fn drag_uses_current_drive_torque() {
        let mut d = drivetrain();
        assert_eq!(d.drag_force(&Vector3::new(0.0, 0.0, 20.0)), Vector3::zeros());
        d.drive_torque = 1200.0;
        let f = d.drag_force(&Vector3::new(0.0, 0.0, d.v_max()));
        assert_relative_eq!(f.z, -1200.0, epsilon = 0.1);
    }
}
