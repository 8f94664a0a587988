//! Scene behaviours
//!
//! Each behaviour is attached to an owning entity and driven through the
//! [`Behaviour`](crate::core::Behaviour) trait.

mod collider_trigger;
mod float;
mod follow;
mod mover;
mod raycast_trigger;
pub mod spawner;

pub use collider_trigger::ColliderTrigger;
pub use float::FloatUpAndDown;
pub use follow::FollowWorldPosition;
pub use mover::{MoveDirection, SimpleMover};
pub use raycast_trigger::RaycastTrigger;
pub use spawner::{
    BasicSpawner, ConfigError, Instantiate, Pooled, PooledSpawner, SpawnPolicy, SpawnState,
    Spawner, SpawnerConfig,
};
