//! wheel - per-wheel raycast suspension + force model (host-agnostic).

pub mod types;
pub mod kinematics;
pub mod suspension;
pub mod grip;
pub mod longitudinal;
pub mod solve;
pub mod state;

pub use types::*;
pub use solve::{WheelForces, solve_wheel};
pub use state::Wheel;
