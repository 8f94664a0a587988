//! Periodic spawners
//!
//! A [`Spawner`] owns the spawn loop: a repeating timer that, while running,
//! asks its [`SpawnPolicy`] for one item per firing. Two policies exist:
//!
//! - [`Instantiate`]: a fresh entity every time, never reclaimed
//! - [`Pooled`]: entities come from an [`ObjectPool`](crate::pool::ObjectPool)
//!   and go back to it through [`Spawner::release`]
//!
//! ```ignore
//! let config = SpawnerConfig::new(Prefab::new("Bullet"), 0.5).with_prewarm(10);
//! let mut spawner = PooledSpawner::pooled(owner, config);
//! spawner.start(&mut ctx);
//! ```

mod config;
mod policy;

pub use config::{ConfigError, SpawnerConfig};
pub use policy::{Instantiate, Pooled, SpawnPolicy};

use hecs::Entity;

use crate::core::{Behaviour, EngineContext, GameEvent, TimerHandle};
use crate::ecs::Prefab;
use crate::pool::ObjectPool;

/// Spawner creating a new entity per tick
pub type BasicSpawner = Spawner<Instantiate>;

/// Spawner reusing entities from a pool
pub type PooledSpawner = Spawner<Pooled>;

/// Spawn loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnState {
    /// No timer running
    Stopped,
    /// Spawning on every timer firing
    Running(TimerHandle),
}

/// Timer-driven spawner attached to an owning entity.
///
/// Items appear at the owner's transform. A misconfigured spawner logs one
/// warning when it is built and afterwards ignores every call.
#[derive(Debug)]
pub struct Spawner<P: SpawnPolicy> {
    owner: Entity,
    config: SpawnerConfig,
    policy: P,
    state: SpawnState,
    /// Set when the config failed validation
    disabled: bool,
    spawned: u64,
}

impl<P: SpawnPolicy> Spawner<P> {
    /// Build a spawner with an explicit policy
    pub fn with_policy(owner: Entity, config: SpawnerConfig, policy: P) -> Self {
        let disabled = match config.validate() {
            Ok(()) => false,
            Err(e) => {
                log::warn!("{} on {owner:?} is misconfigured and will not spawn: {e}", P::NAME);
                true
            }
        };

        Self {
            owner,
            config,
            policy,
            state: SpawnState::Stopped,
            disabled,
            spawned: 0,
        }
    }

    /// Start spawning. Does nothing if already running or misconfigured.
    pub fn start(&mut self, ctx: &mut EngineContext) {
        if self.disabled || self.is_running() {
            return;
        }
        let Some(interval) = self.config.interval() else {
            return;
        };

        if let Some(handle) = ctx.timers.start_repeating(interval) {
            log::debug!("{} on {:?} started, every {interval:?}", P::NAME, self.owner);
            self.state = SpawnState::Running(handle);
        }
    }

    /// Stop spawning. Does nothing if already stopped.
    ///
    /// Firings that were due but not yet handled are discarded.
    pub fn stop(&mut self, ctx: &mut EngineContext) {
        if let SpawnState::Running(handle) = self.state {
            ctx.timers.cancel(handle);
            self.state = SpawnState::Stopped;
            log::debug!("{} on {:?} stopped", P::NAME, self.owner);
        }
    }

    /// Whether the spawn loop is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, SpawnState::Running(_))
    }

    /// Current loop state
    #[must_use]
    pub fn state(&self) -> SpawnState {
        self.state
    }

    /// Whether the config failed validation
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Entity the spawner is attached to
    #[must_use]
    pub fn owner(&self) -> Entity {
        self.owner
    }

    /// The spawner's configuration
    #[must_use]
    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Total items handed out since creation
    #[must_use]
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// The spawn policy
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Spawn one item right away, independent of the timer.
    pub fn spawn_now(&mut self, ctx: &mut EngineContext) -> Option<Entity> {
        let template = usable_template(&self.config, self.disabled)?;
        let item = self.policy.spawn(ctx, self.owner, template)?;
        self.spawned += 1;
        ctx.events.push(GameEvent::ItemSpawned {
            spawner: self.owner,
            item,
        });
        Some(item)
    }
}

/// Template to spawn from; `None` when misconfigured.
///
/// Takes the fields rather than the spawner so the policy can be borrowed
/// mutably at the same time.
fn usable_template(config: &SpawnerConfig, disabled: bool) -> Option<&Prefab> {
    if disabled {
        return None;
    }
    config.template.as_ref()
}

impl Spawner<Instantiate> {
    /// Spawner creating a fresh entity on every tick
    pub fn basic(owner: Entity, config: SpawnerConfig) -> Self {
        Self::with_policy(owner, config, Instantiate)
    }
}

impl Spawner<Pooled> {
    /// Spawner reusing entities from a pool bounded by `max_retained_count`
    pub fn pooled(owner: Entity, config: SpawnerConfig) -> Self {
        let pool = Pooled::new(config.max_retained_count);
        Self::with_policy(owner, config, pool)
    }

    /// Hand an item back to the pool.
    ///
    /// The item must have been spawned by this spawner and not released
    /// since; anything else is not detected.
    pub fn release(&mut self, ctx: &mut EngineContext, item: Entity) {
        let Some(template) = usable_template(&self.config, self.disabled) else {
            return;
        };
        self.policy.release(ctx, self.owner, template, item);
        ctx.events.push(GameEvent::ItemReleased {
            spawner: self.owner,
            item,
        });
    }

    /// The underlying pool
    #[must_use]
    pub fn pool(&self) -> &ObjectPool<Entity> {
        self.policy.pool()
    }
}

impl<P: SpawnPolicy> Behaviour for Spawner<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let Some(template) = usable_template(&self.config, self.disabled) else {
            return;
        };
        if self.config.prewarm_on_init {
            self.policy
                .prewarm(ctx, self.owner, template, self.config.prewarm_count);
        }
        if self.config.start_on_init {
            self.start(ctx);
        }
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if let SpawnState::Running(handle) = self.state {
            for _ in 0..ctx.timers.take_fired(handle) {
                if self.spawn_now(ctx).is_none() {
                    break;
                }
            }
        }
        self.policy.publish_stats(ctx, self.owner);
    }

    fn on_destroy(&mut self, ctx: &mut EngineContext) {
        self.stop(ctx);
        if let Some(template) = usable_template(&self.config, self.disabled) {
            self.policy.teardown(ctx, self.owner, template);
        }
    }
}
