//! What a spawner does on each tick

use std::fmt;

use hecs::Entity;
use rustc_hash::FxHashSet;

use crate::core::EngineContext;
use crate::ecs::{PooledBy, Prefab, SpawnedBy, Transform, World};
use crate::pool::{ObjectPool, PoolLifecycle};

/// Strategy a [`Spawner`](super::Spawner) uses to produce items.
pub trait SpawnPolicy: fmt::Debug {
    /// Name used for logging
    const NAME: &'static str;

    /// Produce one item at the owner's transform.
    ///
    /// Returns `None` if the owner no longer exists.
    fn spawn(&mut self, ctx: &mut EngineContext, owner: Entity, template: &Prefab)
    -> Option<Entity>;

    /// Create `count` items ahead of time, if the policy keeps any.
    fn prewarm(
        &mut self,
        _ctx: &mut EngineContext,
        _owner: Entity,
        _template: &Prefab,
        _count: usize,
    ) {
    }

    /// Release everything the policy owns.
    fn teardown(&mut self, _ctx: &mut EngineContext, _owner: Entity, _template: &Prefab) {}

    /// Publish per-frame counters to the debug overlay.
    fn publish_stats(&mut self, _ctx: &mut EngineContext, _owner: Entity) {}
}

fn owner_transform(world: &World, owner: Entity) -> Option<Transform> {
    let transform = world.transform(owner);
    if transform.is_none() {
        log::debug!("Spawner owner {owner:?} has no transform, skipping spawn");
    }
    transform
}

// ============================================================================
// Plain instantiation
// ============================================================================

/// Creates a brand-new entity per tick and forgets about it.
///
/// Spawned entities are placed at the owner's position with identity
/// rotation and marked with [`SpawnedBy`]. Whatever despawns them is up to
/// the game.
#[derive(Debug, Clone, Copy, Default)]
pub struct Instantiate;

impl SpawnPolicy for Instantiate {
    const NAME: &'static str = "Spawner";

    fn spawn(
        &mut self,
        ctx: &mut EngineContext,
        owner: Entity,
        template: &Prefab,
    ) -> Option<Entity> {
        let origin = owner_transform(&ctx.world, owner)?;
        let item = template.instantiate(
            &mut ctx.world,
            Transform::from_position(origin.position),
            true,
        );
        ctx.world.insert_one(item, SpawnedBy(owner)).ok()?;
        Some(item)
    }
}

// ============================================================================
// Pooled reuse
// ============================================================================

/// Pool hooks for entity items.
///
/// Items are created inactive, moved to `placement` and activated when
/// handed out, deactivated when returned and despawned when destroyed.
struct EntityHooks<'a> {
    world: &'a mut World,
    template: &'a Prefab,
    owner: Entity,
    placement: Transform,
}

impl PoolLifecycle<Entity> for EntityHooks<'_> {
    fn create(&mut self) -> Entity {
        let item = self
            .template
            .instantiate(self.world, Transform::default(), false);
        if let Err(e) = self.world.insert_one(item, PooledBy(self.owner)) {
            log::warn!("Failed to mark pooled item {item:?}: {e}");
        }
        log::debug!("Created pooled {} {item:?}", self.template.name);
        item
    }

    fn on_acquire(&mut self, item: &mut Entity) {
        if let Ok(mut transform) = self.world.get_mut::<Transform>(*item) {
            transform.position = self.placement.position;
            transform.rotation = self.placement.rotation;
        }
        if let Err(e) = self.world.set_active(*item, true) {
            log::warn!("Failed to activate pooled item {item:?}: {e}");
        }
    }

    fn on_release(&mut self, item: &mut Entity) {
        if let Err(e) = self.world.set_active(*item, false) {
            log::warn!("Failed to deactivate pooled item {item:?}: {e}");
        }
    }

    fn on_destroy(&mut self, item: Entity) {
        if let Err(e) = self.world.despawn(item) {
            log::warn!("Failed to despawn pooled item {item:?}: {e}");
        }
    }
}

/// Reuses entities through an [`ObjectPool`].
///
/// Items are placed at the owner's position and rotation and marked with
/// [`PooledBy`].
#[derive(Debug)]
pub struct Pooled {
    pool: ObjectPool<Entity>,
}

impl Pooled {
    /// Pool retaining at most `max_retained` idle entities
    #[must_use]
    pub fn new(max_retained: usize) -> Self {
        Self {
            pool: ObjectPool::new(max_retained),
        }
    }

    /// The underlying pool
    #[must_use]
    pub fn pool(&self) -> &ObjectPool<Entity> {
        &self.pool
    }

    /// Return an item to the pool.
    ///
    /// Entities that no longer exist are ignored with a warning.
    pub fn release(
        &mut self,
        ctx: &mut EngineContext,
        owner: Entity,
        template: &Prefab,
        item: Entity,
    ) {
        if !ctx.world.contains(item) {
            log::warn!("Ignoring release of despawned item {item:?}");
            return;
        }
        let mut hooks = EntityHooks {
            world: &mut ctx.world,
            template,
            owner,
            placement: Transform::default(),
        };
        self.pool.release(&mut hooks, item);
    }
}

impl SpawnPolicy for Pooled {
    const NAME: &'static str = "PooledSpawner";

    fn spawn(
        &mut self,
        ctx: &mut EngineContext,
        owner: Entity,
        template: &Prefab,
    ) -> Option<Entity> {
        let placement = owner_transform(&ctx.world, owner)?;
        let mut hooks = EntityHooks {
            world: &mut ctx.world,
            template,
            owner,
            placement,
        };
        Some(self.pool.acquire(&mut hooks))
    }

    fn prewarm(
        &mut self,
        ctx: &mut EngineContext,
        owner: Entity,
        template: &Prefab,
        count: usize,
    ) {
        let placement = ctx.world.transform(owner).unwrap_or_default();
        let mut hooks = EntityHooks {
            world: &mut ctx.world,
            template,
            owner,
            placement,
        };
        self.pool.prewarm(&mut hooks, count);
        log::debug!(
            "Prewarmed {} with {count} items: {}",
            Self::NAME,
            self.pool.stats()
        );
    }

    fn teardown(&mut self, ctx: &mut EngineContext, owner: Entity, template: &Prefab) {
        // Members that are not idle are held by the game, active or not
        let idle: FxHashSet<Entity> = self.pool.idle().iter().copied().collect();
        let active: Vec<Entity> = ctx
            .world
            .query::<&PooledBy>()
            .iter()
            .filter(|(entity, pooled_by)| pooled_by.0 == owner && !idle.contains(entity))
            .map(|(entity, _)| entity)
            .collect();

        let mut hooks = EntityHooks {
            world: &mut ctx.world,
            template,
            owner,
            placement: Transform::default(),
        };
        self.pool.dispose(&mut hooks, active);
    }

    fn publish_stats(&mut self, ctx: &mut EngineContext, owner: Entity) {
        ctx.debug
            .watch(format!("{} {owner:?}", Self::NAME), self.pool.stats());
    }
}
