//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod prefab;
mod world;

pub use components::{Active, Name, PooledBy, SpawnedBy, Tags, Transform};
pub use prefab::Prefab;
pub use world::World;
