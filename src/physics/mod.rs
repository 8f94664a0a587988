//! Physics module
//!
//! Scene queries built on top of rapier3d

mod world;

pub use world::{ColliderHandle, LayerMask, Physics, RaycastHit, RigidBodyHandle};
