//! Scene behaviours for a headless ECS engine
//!
//! This crate provides:
//! - A fixed-step host loop with timers, events and debug stats
//! - Entity Component System (ECS) scene state with hecs
//! - Physics queries with rapier3d
//! - A generic object pool and periodic spawners built on it
//! - Small reusable behaviours: triggers, movers, followers

pub mod behaviours;
pub mod core;
pub mod ecs;
pub mod physics;
pub mod pool;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::behaviours::{
        BasicSpawner, ColliderTrigger, FloatUpAndDown, FollowWorldPosition, MoveDirection,
        PooledSpawner, RaycastTrigger, SimpleMover, SpawnerConfig,
    };
    pub use crate::core::{
        Behaviour, Behaviours, DebugInfo, Engine, EngineConfig, EngineContext, FrameStats, Game,
        GameEvent, Signal,
    };
    pub use crate::ecs::{Active, Name, PooledBy, Prefab, SpawnedBy, Tags, Transform, World};
    pub use crate::physics::{LayerMask, Physics};
    pub use crate::pool::{ObjectPool, PoolLifecycle};
    pub use glam::{Quat, Vec3};
    pub use hecs::Entity;
}
