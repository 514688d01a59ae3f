// src/physics.rs

use log::{info, warn};
use rapier3d::prelude::*;

use crate::config::{ChassisConfig, WorldConfig};
use crate::suspension_contact::PhysicsQuery;
use crate::wheel::types::AppliedForce;

const GROUP_GROUND: Group  = Group::from_bits_truncate(0b0001);
const GROUP_CHASSIS: Group = Group::from_bits_truncate(0b0010);

const WORLD_BOUNDS: Real = 1_000.0;

/// rapier world holding a static ground box and the car chassis.
pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd: CCDSolver,
    pub query_pipeline: QueryPipeline, // wheel rays
    spawn_point: Vector<Real>,         // safety reset target
}

impl PhysicsWorld {
    pub fn new(cfg: &WorldConfig) -> Self {
        let gravity = vector![0.0, -cfg.gravity, 0.0];

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Big static ground box, top surface exactly at y = 0.
        let ground_rb = RigidBodyBuilder::fixed()
            .translation(vector![0.0, -0.5, 0.0])
            .build();

        let ground_handle = bodies.insert(ground_rb);

        let ground_collider = ColliderBuilder::cuboid(500.0, 0.5, 500.0)
            .collision_groups(InteractionGroups::new(
                GROUP_GROUND,
                GROUP_CHASSIS,
            ))
            .friction(1.2)
            .restitution(0.0)
            .build();

        colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);

        info!(
            "🌎 Ground inserted. Bodies = {}, Colliders = {}",
            bodies.len(),
            colliders.len()
        );

        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            spawn_point: vector![0.0, 1.0, 0.0],
        }
    }

    /// Dynamic box chassis. Wheels are pure raycasts; the box never touches
    /// the ground with friction.
    pub fn spawn_chassis(&mut self, cfg: &ChassisConfig) -> RigidBodyHandle {
        let [px, py, pz] = cfg.spawn_position;
        let [hx, hy, hz] = cfg.half_extents;
        let [cx, cy, cz] = cfg.com_offset;
        let volume = 8.0 * hx * hy * hz;
        let density = cfg.mass / volume; // ρ = m / V

        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![px, py, pz])
            .ccd_enabled(true)
            .build();

        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .translation(vector![cx, cy, cz]) // COM offset
            .collision_groups(InteractionGroups::new(
                GROUP_CHASSIS,
                GROUP_GROUND,
            ))
            .density(density)
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = self.bodies.insert(rb);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        self.spawn_point = vector![px, py, pz];

        // make the new collider visible to ray casts before the first step
        self.query_pipeline.update(&self.colliders);

        info!("🚗 Spawned chassis at {:?} (body = {:?}, mass = {} kg)", cfg.spawn_position, handle, cfg.mass);
        handle
    }

    pub fn chassis(&self, body: RigidBodyHandle) -> ChassisQuery<'_> {
        ChassisQuery { world: self, body }
    }

    /// Forces are held for one step: applied as impulses `F * dt`.
    pub fn apply_forces(&mut self, body: RigidBodyHandle, forces: &[AppliedForce], dt: Real) {
        let Some(rb) = self.bodies.get_mut(body) else { return };

        for f in forces {
            if !f.is_finite() {
                warn!("⚠️ Dropping non-finite force {:?}", f);
                continue;
            }
            let impulse = f.force * dt;
            match f.at_point {
                Some(p) => rb.apply_impulse_at_point(impulse, p, true),
                None => rb.apply_impulse(impulse, true),
            }
        }
    }

    pub fn step(&mut self, dt: Real) {
        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // Safety: prevent bodies from exploding to insane coordinates
        for (_, body) in self.bodies.iter_mut() {
            let pos = *body.translation();

            let bad = !pos.iter().all(|c| c.is_finite())
                || pos.iter().any(|c| c.abs() > WORLD_BOUNDS);

            if bad {
                body.set_translation(self.spawn_point, true);
                body.set_rotation(Rotation::identity(), true);
                body.set_linvel(vector![0.0, 0.0, 0.0], true);
                body.set_angvel(vector![0.0, 0.0, 0.0], true);

                warn!("⚠️ Reset exploding body back to {:?}", self.spawn_point);
            }
        }
    }
}

/// `PhysicsQuery` over one rapier body.
pub struct ChassisQuery<'a> {
    world: &'a PhysicsWorld,
    body: RigidBodyHandle,
}

impl ChassisQuery<'_> {
    fn rb(&self) -> Option<&RigidBody> {
        self.world.bodies.get(self.body)
    }
}

impl PhysicsQuery for ChassisQuery<'_> {
    fn chassis_pose(&self) -> Isometry<Real> {
        self.rb().map(|b| *b.position()).unwrap_or_else(Isometry::identity)
    }

    fn linear_velocity(&self) -> Vector<Real> {
        self.rb().map(|b| *b.linvel()).unwrap_or_else(Vector::zeros)
    }

    fn point_velocity(&self, point: &Point<Real>) -> Vector<Real> {
        self.rb().map(|b| b.velocity_at_point(point)).unwrap_or_else(Vector::zeros)
    }

    fn cast_ray(&self, origin: &Point<Real>, dir: &Vector<Real>, max_toi: Real) -> Option<Real> {
        let ray = Ray::new(*origin, *dir);
        let filter = QueryFilter::default().exclude_rigid_body(self.body);

        self.world
            .query_pipeline
            .cast_ray(&self.world.bodies, &self.world.colliders, &ray, max_toi, true, filter)
            .map(|(_, toi)| toi)
    }
}
