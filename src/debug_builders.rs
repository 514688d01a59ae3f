// ==============================================================================
// debug_builders.rs — DEBUG GIZMO PRIMITIVES (CORE -> HOST)
// ------------------------------------------------------------------------------
// Defines serializable debug primitives:
// - DebugPolyline: wheel outline circles
// - DebugLine: lateral grip force per wheel (optional)
// - DebugWheel: per-wheel numeric state (grounded, distance, spin, steer)
//
// build_overlay() reads the vehicle after a physics step. This file is purely
// visualization scaffolding and has no physics side effects.
// ==============================================================================

use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::f32::consts::PI;

use crate::suspension_contact::{PhysicsQuery, mount_world};
use crate::vehicle::Vehicle;
use crate::wheel::kinematics::wheel_basis;
use crate::wheel::types::{Real, WheelBasis};

pub const CIRCLE_SEGMENTS: usize = 32;
pub const WHEEL_COLOR: [f32; 3] = [0.0, 1.0, 0.0];       // green
pub const LATERAL_FORCE_COLOR: [f32; 3] = [1.0, 0.0, 0.0]; // red

#[derive(Clone, Debug, Default, Serialize)]
pub struct DebugOverlay {
    pub wheels: Vec<DebugWheel>,
    pub circles: Vec<DebugPolyline>,
    pub force_lines: Vec<DebugLine>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugPolyline {
    pub points: Vec<[f32; 3]>,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugLine {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugWheel {
    pub id: String,                 // "FL", "FR", "RL", "RR"
    pub center: [f32; 3],           // in world space
    pub radius: f32,
    pub grounded: bool,
    pub ground_distance: Option<f32>,
    pub spin_deg: f32,
    pub steer_deg: f32,
}

#[inline] fn p3(p: Point3<Real>) -> [f32; 3] { [p.x, p.y, p.z] }

/// Closed circle in the wheel's up/forward plane (`segments + 1` points).
pub fn wheel_circle(center: Point3<Real>, basis: &WheelBasis, radius: Real, segments: usize) -> Vec<[f32; 3]> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = i as Real * 2.0 * PI / segments as Real;
            let offset: Vector3<Real> = (basis.up * angle.sin() + basis.forward * angle.cos()) * radius;
            p3(center + offset)
        })
        .collect()
}

pub fn build_overlay<Q: PhysicsQuery + ?Sized>(vehicle: &Vehicle, query: &Q, draw_forces: bool) -> DebugOverlay {
    let mut overlay = DebugOverlay::default();
    let pose = query.chassis_pose();

    for wheel in &vehicle.wheels {
        let center = mount_world(&pose, &wheel.mount);
        let basis = wheel_basis(&pose.rotation, wheel.steer_angle());

        overlay.circles.push(DebugPolyline {
            points: wheel_circle(center, &basis, wheel.config.radius, CIRCLE_SEGMENTS),
            color: WHEEL_COLOR,
        });

        if draw_forces && let Some(forces) = wheel.last_forces() {
            overlay.force_lines.push(DebugLine {
                from: p3(forces.point),
                to: p3(forces.point + forces.lateral),
                color: LATERAL_FORCE_COLOR,
            });
        }

        overlay.wheels.push(DebugWheel {
            id: wheel.id.to_string(),
            center: p3(center),
            radius: wheel.config.radius,
            grounded: wheel.grounded(),
            ground_distance: wheel.ground_distance(),
            spin_deg: wheel.spin_degrees(),
            steer_deg: wheel.steer_angle().to_degrees(),
        });
    }

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VehicleConfig;
    use crate::drivetrain::DriverInput;
    use crate::suspension_contact::testing::FlatGround;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    #[test]
    fn circle_is_closed_and_on_radius() {
        let basis = wheel_basis(&UnitQuaternion::identity(), 0.0);
        let center = Point3::new(1.0, 0.5, -2.0);
        let pts = wheel_circle(center, &basis, 0.5, CIRCLE_SEGMENTS);

        assert_eq!(pts.len(), CIRCLE_SEGMENTS + 1);
        assert_relative_eq!(pts[0][2], pts[CIRCLE_SEGMENTS][2], epsilon = 1e-5);
        for [x, y, z] in pts {
            assert_relative_eq!(x, 1.0, epsilon = 1e-6); // stays in the wheel plane
            let r = ((y - 0.5).powi(2) + (z + 2.0).powi(2)).sqrt();
            assert_relative_eq!(r, 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn force_lines_only_when_requested() {
        let mut v = Vehicle::new(&VehicleConfig::default());
        let host = FlatGround::at_height(0.55).moving(nalgebra::Vector3::new(1.0, 0.0, 5.0));
        v.set_input(DriverInput::from_axes(0.2, 0.5));
        v.frame_update(&host, 1.0 / 30.0);
        v.physics_step(&host, 1.0 / 60.0);

        let quiet = build_overlay(&v, &host, false);
        assert_eq!(quiet.circles.len(), 4);
        assert!(quiet.force_lines.is_empty());

        let loud = build_overlay(&v, &host, true);
        assert_eq!(loud.force_lines.len(), 4);
        assert_eq!(loud.wheels[0].id, "FL");
        assert!(serde_json::to_string(&loud).is_ok());
    }

    #[test]
    fn airborne_wheels_draw_no_force() {
        let v = Vehicle::new(&VehicleConfig::default());
        let host = FlatGround::at_height(10.0);
        let overlay = build_overlay(&v, &host, true);
        assert!(overlay.force_lines.is_empty());
        assert!(overlay.wheels.iter().all(|w| !w.grounded));
    }
}
