//! Core shared types for `wheel`.
// wheel/types.rs
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::fmt;

pub type Real = f32;

// ============================================
// Wheel identification
// ============================================

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum WheelId { FL, FR, RL, RR }

impl WheelId {
    /// Storage order used by the vehicle and the chassis mount table.
    pub const ALL: [WheelId; 4] = [WheelId::FL, WheelId::FR, WheelId::RL, WheelId::RR];

    pub fn index(&self) -> usize {
        match self {
            WheelId::FL => 0,
            WheelId::FR => 1,
            WheelId::RL => 2,
            WheelId::RR => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelId::FL => "FL",
            WheelId::FR => "FR",
            WheelId::RL => "RL",
            WheelId::RR => "RR",
        }
    }

    pub fn is_rear(&self) -> bool {
        matches!(self, WheelId::RL | WheelId::RR)
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// ----- wheel frame + forces -----------------
// ============================================

/// Orthonormal wheel frame in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelBasis {
    pub up: Vector3<Real>,
    pub forward: Vector3<Real>,
    pub right: Vector3<Real>,
}

/// A world-space force for the host to apply this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedForce {
    /// Force in world space (N).
    pub force: Vector3<Real>,

    /// Optional application point (world). If None => apply at COM.
    pub at_point: Option<Point3<Real>>,
}

impl AppliedForce {
    pub fn at(force: Vector3<Real>, point: Point3<Real>) -> Self {
        Self { force, at_point: Some(point) }
    }

    pub fn at_com(force: Vector3<Real>) -> Self {
        Self { force, at_point: None }
    }

    pub fn is_finite(&self) -> bool {
        self.force.iter().all(|c| c.is_finite())
            && self.at_point.is_none_or(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}
