// src/config.rs

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::drivetrain::resistance::top_speed;

const MIN_PHYSICS_HZ: f32 = 1.0;
const MAX_PHYSICS_HZ: f32 = 10_000.0;

// ---------------------------------------------
// WHEEL
// ---------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub radius: f32,          // m
    pub mass: f32,            // kg
    pub rest_length: f32,     // m, suspension neutral distance to ground
    pub probe_length: f32,    // m, ground ray length
    pub spring_strength: f32, // N/m
    pub damping: f32,         // N*s/m
    pub grip_factor: f32,     // 0..1 share of lateral slip cancelled per step
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            mass: 10.0,
            rest_length: 0.5,
            probe_length: 0.5,
            spring_strength: 10_000.0,
            damping: 300.0,
            grip_factor: 0.4,
        }
    }
}

// ---------------------------------------------
// CHASSIS
// ---------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChassisConfig {
    pub mass: f32,                  // kg
    pub half_extents: [f32; 3],     // [hx, hy, hz] meters
    pub com_offset: [f32; 3],       // local offset of the collider (moves the COM)
    pub spawn_position: [f32; 3],   // world
    /// Wheel mounts in chassis space, ordered FL, FR, RL, RR. +Z is forward.
    pub wheel_mounts: [[f32; 3]; 4],
}

impl Default for ChassisConfig {
    fn default() -> Self {
        Self {
            mass: 1000.0,
            half_extents: [0.9, 0.3, 2.0],
            com_offset: [0.0, -0.1, 0.0],
            spawn_position: [0.0, 0.8, 0.0],
            wheel_mounts: [
                [ 0.75, -0.2,  1.25],
                [-0.75, -0.2,  1.25],
                [ 0.75, -0.2, -1.25],
                [-0.75, -0.2, -1.25],
            ],
        }
    }
}

// ---------------------------------------------
// STEERING
// ---------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub wheelbase: f32,           // meters (front axle to rear axle)
    pub track_width: f32,         // meters (left to right)
    pub max_steer_angle_deg: f32, // degrees
    pub ackermann: f32,           // 0..1 blend (0 = parallel, 1 = full ackermann)
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            wheelbase: 2.5,
            track_width: 1.5,
            max_steer_angle_deg: 30.0,
            ackermann: 1.0,
        }
    }
}

// ---------------------------------------------
// ENGINE + TRANSMISSION
// ---------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveLayout {
    RearWheel,
    AllWheel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub idle_rpm: f32,
    pub max_rpm: f32,
    /// `[rpm, torque Nm]` keys, linearly interpolated.
    pub torque_curve: Vec<[f32; 2]>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_rpm: 1000.0,
            max_rpm: 6000.0,
            torque_curve: vec![
                [1000.0, 280.0],
                [2500.0, 360.0],
                [4000.0, 400.0],
                [5200.0, 370.0],
                [6000.0, 300.0],
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmissionConfig {
    pub gear_ratios: Vec<f32>,
    pub differential_ratio: f32,
    pub efficiency: f32,       // 0..1
    pub initial_gear: usize,
    pub shift_cooldown: f32,   // seconds between shifts, 0 = ungated
    pub layout: DriveLayout,
}

impl Default for TransmissionConfig {
    fn default() -> Self {
        Self {
            gear_ratios: vec![2.66, 1.78, 1.3, 1.0, 0.74, 0.5],
            differential_ratio: 3.42,
            efficiency: 0.7,
            initial_gear: 1,
            shift_cooldown: 0.3,
            layout: DriveLayout::RearWheel,
        }
    }
}

// ---------------------------------------------
// VEHICLE
// ---------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub chassis: ChassisConfig,
    pub wheel: WheelConfig,
    pub steering: SteeringConfig,
    pub engine: EngineConfig,
    pub transmission: TransmissionConfig,
    pub brake_force: f32, // N per wheel at full brake
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            chassis: ChassisConfig::default(),
            wheel: WheelConfig::default(),
            steering: SteeringConfig::default(),
            engine: EngineConfig::default(),
            transmission: TransmissionConfig::default(),
            brake_force: 3000.0,
        }
    }
}

// ---------------------------------------------
// WORLD + DRIVER SCRIPT
// ---------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: f32,    // m/s^2, along -Y
    pub physics_hz: f32,
    pub frame_hz: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            physics_hz: 60.0,
            frame_hz: 30.0,
        }
    }
}

/// One segment of the scripted driver: raw stick axes held for `duration` seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub duration: f32,
    pub steer_axis: f32,    // -1..1
    pub vertical_axis: f32, // -1..1, positive = throttle, negative = brake
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub vehicle: VehicleConfig,
    pub script: Vec<ScriptSegment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            vehicle: VehicleConfig::default(),
            script: vec![
                ScriptSegment { duration: 1.0, steer_axis: 0.0, vertical_axis: 0.0 },
                ScriptSegment { duration: 4.0, steer_axis: 0.0, vertical_axis: 1.0 },
                ScriptSegment { duration: 2.0, steer_axis: 0.6, vertical_axis: 0.7 },
                ScriptSegment { duration: 2.0, steer_axis: 0.0, vertical_axis: -1.0 },
            ],
        }
    }
}

impl Config {
    /// Load from a TOML file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.world.gravity.is_finite(), "world.gravity must be finite");
        ensure!(
            (MIN_PHYSICS_HZ..=MAX_PHYSICS_HZ).contains(&self.world.physics_hz),
            "world.physics_hz must be within {MIN_PHYSICS_HZ}..={MAX_PHYSICS_HZ}, got {}",
            self.world.physics_hz
        );
        ensure!(
            self.world.frame_hz.is_finite() && self.world.frame_hz > 0.0,
            "world.frame_hz must be positive"
        );
        ensure!(
            self.world.frame_hz <= self.world.physics_hz,
            "world.frame_hz ({}) cannot exceed physics_hz ({})",
            self.world.frame_hz,
            self.world.physics_hz
        );
        for (i, seg) in self.script.iter().enumerate() {
            ensure!(seg.duration >= 0.0, "script[{i}].duration is negative");
        }
        self.vehicle.validate().context("invalid vehicle config")
    }
}

/// Finite and strictly positive.
fn positive(x: f32) -> bool {
    x.is_finite() && x > 0.0
}

impl VehicleConfig {
    pub fn validate(&self) -> Result<()> {
        let w = &self.wheel;
        ensure!(positive(w.radius), "wheel.radius must be positive, got {}", w.radius);
        ensure!(positive(w.mass), "wheel.mass must be positive, got {}", w.mass);
        ensure!(positive(w.rest_length), "wheel.rest_length must be positive");
        ensure!(positive(w.probe_length), "wheel.probe_length must be positive");
        ensure!(
            w.spring_strength.is_finite() && w.spring_strength >= 0.0
                && w.damping.is_finite() && w.damping >= 0.0,
            "suspension constants must be finite and not negative"
        );
        ensure!((0.0..=1.0).contains(&w.grip_factor), "wheel.grip_factor must be within 0..1");

        let c = &self.chassis;
        ensure!(positive(c.mass), "chassis.mass must be positive");
        ensure!(c.half_extents.iter().all(|h| positive(*h)), "chassis.half_extents must be positive");

        let s = &self.steering;
        ensure!(positive(s.wheelbase), "steering.wheelbase must be positive");
        ensure!(
            s.track_width.is_finite() && s.track_width >= 0.0,
            "steering.track_width cannot be negative"
        );
        ensure!(
            s.max_steer_angle_deg >= 0.0 && s.max_steer_angle_deg < 90.0,
            "steering.max_steer_angle_deg must be within 0..90"
        );
        ensure!((0.0..=1.0).contains(&s.ackermann), "steering.ackermann must be within 0..1");

        let e = &self.engine;
        ensure!(positive(e.idle_rpm), "engine.idle_rpm must be positive");
        ensure!(positive(e.max_rpm), "engine.max_rpm must be positive and finite");
        ensure!(
            e.idle_rpm < e.max_rpm,
            "engine.idle_rpm ({}) must be below max_rpm ({})",
            e.idle_rpm,
            e.max_rpm
        );
        if e.torque_curve.is_empty() {
            bail!("engine.torque_curve needs at least one key");
        }
        ensure!(
            e.torque_curve.iter().all(|[rpm, nm]| rpm.is_finite() && nm.is_finite()),
            "engine.torque_curve keys must be finite"
        );

        let t = &self.transmission;
        if t.gear_ratios.is_empty() {
            bail!("transmission.gear_ratios needs at least one gear");
        }
        ensure!(
            t.gear_ratios.iter().all(|r| positive(*r)),
            "transmission.gear_ratios must all be positive and finite"
        );
        ensure!(
            positive(t.differential_ratio),
            "transmission.differential_ratio must be positive and finite"
        );
        ensure!(
            t.efficiency > 0.0 && t.efficiency <= 1.0,
            "transmission.efficiency must be within (0, 1]"
        );
        ensure!(
            t.shift_cooldown.is_finite() && t.shift_cooldown >= 0.0,
            "transmission.shift_cooldown cannot be negative"
        );

        ensure!(
            self.brake_force.is_finite() && self.brake_force >= 0.0,
            "brake_force cannot be negative"
        );

        // drag divides by v_max squared
        let top_ratio = t.gear_ratios.last().copied().unwrap_or_default();
        let v_max = top_speed(e.max_rpm, top_ratio, t.differential_ratio, w.radius);
        ensure!(
            positive(v_max),
            "top speed must be positive and finite, got {v_max} m/s"
        );
        Ok(())
    }
}
