//! arcade-vehicle - arcade car controller on top of a host physics engine.
//!
//! The core (`wheel`, `drivetrain`, `vehicle`) only reads the chassis through
//! [`suspension_contact::PhysicsQuery`] and returns forces; `physics` is the
//! rapier host that integrates them.

pub mod config;
pub mod debug_builders;
pub mod drivetrain;
pub mod physics;
pub mod state;
pub mod suspension_contact;
pub mod vehicle;
pub mod wheel;

pub use config::Config;
pub use vehicle::Vehicle;
