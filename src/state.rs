use rapier3d::prelude::RigidBodyHandle;
use serde::Serialize;

use crate::config::{Config, ScriptSegment};
use crate::debug_builders::{DebugOverlay, build_overlay};
use crate::drivetrain::DriverInput;
use crate::physics::PhysicsWorld;
use crate::suspension_contact::PhysicsQuery;
use crate::vehicle::{Vehicle, VehicleTelemetry};
use crate::wheel::types::Real;

/// Timed list of stick positions standing in for a live player.
#[derive(Debug, Clone, Default)]
pub struct DriverScript {
    segments: Vec<ScriptSegment>,
}

impl DriverScript {
    pub fn new(segments: Vec<ScriptSegment>) -> Self {
        Self { segments }
    }

    pub fn duration(&self) -> Real {
        self.segments.iter().map(|s| s.duration.max(0.0)).sum()
    }

    /// Input at `time` seconds; neutral once the script has run out.
    pub fn sample(&self, time: Real) -> DriverInput {
        let mut start = 0.0;
        for seg in &self.segments {
            let end = start + seg.duration.max(0.0);
            if time >= start && time < end {
                return DriverInput::from_axes(seg.steer_axis, seg.vertical_axis);
            }
            start = end;
        }
        DriverInput::default()
    }
}

#[derive(Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: f32,
    pub position: [f32; 3],
    pub vehicle: VehicleTelemetry,
}

/// One simulated car in one world, stepped at the physics rate with the
/// control update every `frame_every` steps.
pub struct SimState {
    pub tick: u64,
    pub time: Real,
    pub world: PhysicsWorld,
    pub body: RigidBodyHandle,
    pub vehicle: Vehicle,
    script: DriverScript,
    step_dt: Real,
    frame_every: u64,
}

impl SimState {
    /// Expects a validated config.
    pub fn new(cfg: &Config) -> Self {
        let mut world = PhysicsWorld::new(&cfg.world);
        let body = world.spawn_chassis(&cfg.vehicle.chassis);
        let frame_every = (cfg.world.physics_hz / cfg.world.frame_hz).round().max(1.0) as u64;

        Self {
            tick: 0,
            time: 0.0,
            world,
            body,
            vehicle: Vehicle::new(&cfg.vehicle),
            script: DriverScript::new(cfg.script.clone()),
            step_dt: 1.0 / cfg.world.physics_hz,
            frame_every,
        }
    }

    pub fn step_dt(&self) -> Real { self.step_dt }
    pub fn frame_dt(&self) -> Real { self.step_dt * self.frame_every as Real }
    pub fn script(&self) -> &DriverScript { &self.script }

    /// Advance one physics step, running the frame update first when due.
    pub fn advance(&mut self) {
        let dt = self.step_dt;
        let frame_dt = self.frame_dt();

        if self.tick % self.frame_every == 0 {
            self.vehicle.set_input(self.script.sample(self.time));
            let query = self.world.chassis(self.body);
            self.vehicle.frame_update(&query, frame_dt);
        }

        let query = self.world.chassis(self.body);
        let forces = self.vehicle.physics_step(&query, dt);

        self.world.apply_forces(self.body, &forces, dt);
        self.world.step(dt);

        self.tick += 1;
        self.time += dt;
    }

    pub fn snapshot(&self) -> Snapshot {
        let query = self.world.chassis(self.body);
        let p = query.chassis_pose().translation.vector;
        Snapshot {
            tick: self.tick,
            time: self.time,
            position: [p.x, p.y, p.z],
            vehicle: self.vehicle.telemetry(&query),
        }
    }

    pub fn overlay(&self, draw_forces: bool) -> DebugOverlay {
        build_overlay(&self.vehicle, &self.world.chassis(self.body), draw_forces)
    }
}
